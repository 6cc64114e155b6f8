//! shell::commands::auth
//!
//! `login` and `logout`.

use std::io;

use crate::shell::command::Command;
use crate::shell::context::ShellContext;
use crate::shell::errors::ShellError;
use crate::shell::reply::Reply;

use super::meta::status_reply;

pub const ALREADY_LOGGED_IN: &str = "Already logged in.";
pub const NOT_LOGGED_IN: &str = "You are not logged in.";

/// Log in with exactly two arguments.
pub fn login(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    if ctx.is_authenticated() {
        return Ok(Reply::notice(ALREADY_LOGGED_IN));
    }

    let [username, password] = cmd.args.as_slice() else {
        return Err(ShellError::Usage(cmd.verb.usage().to_string()));
    };

    let profile = ctx.login(username, password)?;
    Ok(Reply::success(format!("Logged in as {}.", profile.username)).extend(status_reply(ctx)))
}

/// Drop the session and delete the credential file.
pub fn logout(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    cmd.expect_none()?;

    if !ctx.is_authenticated() {
        return Ok(Reply::notice(NOT_LOGGED_IN));
    }

    ctx.logout().map_err(|e| ShellError::Io {
        context: "failed to clear session".to_string(),
        source: io::Error::other(e.to_string()),
    })?;
    Ok(Reply::success("Logged out.").extend(status_reply(ctx)))
}

#[cfg(test)]
mod tests {
    use super::super::testing::Fixture;
    use super::*;
    use crate::session::AuthError;
    use crate::shell::command::{parse, Input};

    fn command(line: &str) -> Command {
        match parse(line).unwrap() {
            Input::Known(cmd) => cmd,
            other => panic!("not a command: {:?}", other),
        }
    }

    #[test]
    fn login_success_shows_profile() {
        let mut fx = Fixture::new();
        let reply = fx.run("login alice hunter2").expect("login");

        assert!(fx.ctx.is_authenticated());
        assert!(reply.text().contains("Logged in as alice."));
        assert!(reply.text().contains("alice@example.com"));
    }

    #[test]
    fn login_wrong_password() {
        let mut fx = Fixture::new();
        let err = fx.run("login alice nope").unwrap_err();

        assert!(matches!(err, ShellError::Auth(AuthError::Rejected)));
        assert!(!fx.ctx.is_authenticated());
    }

    #[test]
    fn login_offline_is_not_fatal() {
        let mut fx = Fixture::new();
        fx.api.set_offline(true);

        let err = fx.run("login alice hunter2").unwrap_err();
        assert!(matches!(err, ShellError::Auth(ref e) if e.is_transient()));
        assert!(fx.run("help").is_ok());
    }

    #[test]
    fn login_arity_is_exact() {
        let mut fx = Fixture::new();
        for line in ["login", "login alice", "login a b c"] {
            let err = fx.run(line).unwrap_err();
            assert_eq!(err.to_string(), "usage: login <username> <password>");
        }
        assert!(fx.api.operations().is_empty());
    }

    #[test]
    fn login_twice_is_a_notice() {
        let mut fx = Fixture::authenticated();
        let before = fx.api.operations().len();

        let reply = fx.run("login alice hunter2").expect("notice");
        assert_eq!(reply, Reply::notice(ALREADY_LOGGED_IN));
        assert_eq!(fx.api.operations().len(), before);
    }

    #[test]
    fn already_logged_in_wins_over_arity() {
        let mut fx = Fixture::authenticated();
        for line in ["login", "login x", "login a b c"] {
            assert_eq!(fx.run(line).unwrap(), Reply::notice(ALREADY_LOGGED_IN));
        }
    }

    #[test]
    fn logout_clears_session_and_file() {
        let mut fx = Fixture::authenticated();
        let credential = fx.ctx.session().credential_path().to_path_buf();
        assert!(credential.exists());

        let reply = fx.run("logout").expect("logout");

        assert!(reply.text().contains("Logged out."));
        assert!(!fx.ctx.is_authenticated());
        assert!(!credential.exists());
    }

    #[test]
    fn logout_when_logged_out_is_a_notice() {
        let mut fx = Fixture::new();
        let reply = logout(&mut fx.ctx, &command("logout")).expect("notice");
        assert_eq!(reply, Reply::notice(NOT_LOGGED_IN));
    }

    #[test]
    fn restored_session_counts_as_logged_in() {
        let fx = Fixture::authenticated();
        let base = fx.temp.path().join("second");
        let mut second = Fixture::context(&base, &fx.api, Default::default());
        assert!(!second.is_authenticated());

        std::fs::copy(
            fx.ctx.session().credential_path(),
            second.session().credential_path(),
        )
        .unwrap();

        second.try_restore().expect("restore");
        assert!(second.is_authenticated());
        assert_eq!(
            crate::shell::commands::execute(&mut second, "login alice hunter2").unwrap(),
            Reply::notice(ALREADY_LOGGED_IN)
        );
    }
}
