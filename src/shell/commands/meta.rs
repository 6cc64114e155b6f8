//! shell::commands::meta
//!
//! `help`, `clear` and `exit`.

use crate::shell::command::{Command, Verb};
use crate::shell::context::ShellContext;
use crate::shell::errors::ShellError;
use crate::shell::reply::{Reply, Tone};
use crate::ui::banner;

/// Clear screen and move the cursor home.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn help(cmd: &Command) -> Result<Reply, ShellError> {
    cmd.expect_none()?;

    let width = Verb::ALL
        .iter()
        .map(|v| v.usage().len())
        .max()
        .unwrap_or(0);

    let reply = Verb::ALL.iter().fold(
        Reply::plain("Available commands:"),
        |reply, verb| {
            reply.line(
                Tone::Plain,
                format!("  {:<width$}  {}", verb.usage(), verb.description(), width = width),
            )
        },
    );
    Ok(reply)
}

pub fn clear(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    cmd.expect_none()?;
    Ok(Reply::empty()
        .line(Tone::Control, CLEAR_SCREEN)
        .extend(status_reply(ctx)))
}

pub fn exit(cmd: &Command) -> Result<Reply, ShellError> {
    cmd.expect_none()?;
    Ok(Reply::exit())
}

/// The status panel for the current session.
pub fn status_reply(ctx: &ShellContext) -> Reply {
    banner::status_lines(ctx.session().profile())
        .into_iter()
        .fold(Reply::empty(), |reply, line| reply.line(Tone::Plain, line))
}
