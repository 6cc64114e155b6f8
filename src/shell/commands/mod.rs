//! shell::commands
//!
//! Command handlers and dispatch.
//!
//! # Lifecycle
//!
//! Each input line goes through Parse → Gate → Handle. Handlers take the
//! [`ShellContext`] and the parsed [`Command`], validate their own
//! arguments, and return a [`Reply`]. They never print.

mod auth;
mod fs;
mod meta;
mod tools;
mod transfer;

use crate::ui::output;

use super::command::{self, Command, Input, Verb};
use super::context::ShellContext;
use super::errors::ShellError;
use super::gate::gate;
use super::reply::Reply;

pub use meta::status_reply;

/// Parse, gate and run one input line.
///
/// # Errors
///
/// Any [`ShellError`] from parsing, gating or the handler. The context is
/// unchanged when an error is returned, except where a handler documents
/// otherwise.
pub fn execute(ctx: &mut ShellContext, line: &str) -> Result<Reply, ShellError> {
    let input = command::parse(line)?;
    gate(&input, ctx.is_authenticated())?;

    match input {
        Input::Blank => Ok(Reply::empty()),
        Input::Unknown(raw) => Err(ShellError::UnknownCommand(raw)),
        Input::Known(cmd) => {
            output::debug(format!("dispatch {}", cmd.verb.name()), ctx.verbosity);
            dispatch(ctx, &cmd)
        }
    }
}

fn dispatch(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    match cmd.verb {
        Verb::Ls => fs::ls(ctx, cmd),
        Verb::Cd => fs::cd(ctx, cmd),
        Verb::Mkdir => fs::mkdir(ctx, cmd),
        Verb::Cat => fs::cat(ctx, cmd),
        Verb::Upload => transfer::upload(ctx, cmd),
        Verb::Download => transfer::download(ctx, cmd),
        Verb::GitClone => tools::git_clone(ctx, cmd),
        Verb::Run => tools::run(ctx, cmd),
        Verb::Install => tools::install(ctx, cmd),
        Verb::Login => auth::login(ctx, cmd),
        Verb::Logout => auth::logout(ctx, cmd),
        Verb::Clear => meta::clear(ctx, cmd),
        Verb::Help => meta::help(cmd),
        Verb::Exit => meta::exit(cmd),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::Fixture;
    use super::*;
    use std::fs;

    #[test]
    fn unauthenticated_ls_is_rejected() {
        let mut fx = Fixture::new();
        let err = fx.run("ls").unwrap_err();
        assert!(matches!(err, ShellError::NotAuthenticated(ref v) if v == "ls"));
    }

    #[test]
    fn unauthenticated_help_succeeds() {
        let mut fx = Fixture::new();
        let reply = fx.run("help").expect("help");
        assert!(reply.text().contains("login <username> <password>"));
    }

    #[test]
    fn gate_runs_before_argument_checks() {
        let mut fx = Fixture::new();
        assert!(matches!(
            fx.run("cd").unwrap_err(),
            ShellError::NotAuthenticated(_)
        ));
    }

    #[test]
    fn unknown_verb_depends_on_state() {
        let mut fx = Fixture::new();
        assert!(matches!(
            fx.run("frobnicate").unwrap_err(),
            ShellError::NotAuthenticated(_)
        ));

        fx.run("login alice hunter2").expect("login");
        assert!(matches!(
            fx.run("frobnicate x").unwrap_err(),
            ShellError::UnknownCommand(ref raw) if raw == "frobnicate x"
        ));
    }

    #[test]
    fn blank_line_is_a_no_op() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("   ").expect("blank"), Reply::empty());
    }

    #[test]
    fn walkthrough_mkdir_cd_escape() {
        let mut fx = Fixture::authenticated();

        fx.run("mkdir notes").expect("mkdir");
        fx.run("cd notes").expect("cd");
        assert_eq!(fx.ctx.location(), "/notes");

        let err = fx.run("mkdir ../../escape").unwrap_err();
        assert!(err.is_access_denied());
        assert!(!fx.temp.path().join("escape").exists());
    }

    #[test]
    fn walkthrough_cd_up_stops_at_root() {
        let mut fx = Fixture::authenticated();
        fs::create_dir(fx.root().join("sub")).unwrap();

        fx.run("cd sub").expect("cd sub");
        fx.run("cd ..").expect("cd ..");
        assert_eq!(fx.ctx.cwd(), fx.root());

        let err = fx.run("cd ..").unwrap_err();
        assert!(err.is_access_denied());
        assert_eq!(fx.ctx.cwd(), fx.root());
    }

    #[test]
    fn logout_relocks_the_shell() {
        let mut fx = Fixture::authenticated();
        fx.run("ls").expect("ls while logged in");

        fx.run("logout").expect("logout");
        assert!(matches!(
            fx.run("ls").unwrap_err(),
            ShellError::NotAuthenticated(_)
        ));
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        let mut fx = Fixture::authenticated();
        assert!(matches!(
            fx.run("cat \"open").unwrap_err(),
            ShellError::Usage(_)
        ));
    }
}
