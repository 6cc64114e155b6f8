//! shell::commands::fs
//!
//! `ls`, `cd`, `mkdir` and `cat`.

use std::fs;

use crate::shell::command::Command;
use crate::shell::context::ShellContext;
use crate::shell::errors::ShellError;
use crate::shell::reply::{Reply, Tone};
use crate::ui::output;

/// Notice shown for an empty directory.
pub const EMPTY_LISTING: &str = "No files or folders.";

/// List the current location in directory-listing order.
pub fn ls(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    cmd.expect_none()?;

    let location = ctx.location();
    let entries = fs::read_dir(ctx.cwd()).map_err(|e| ShellError::from_io(e, &location))?;

    let mut reply = Reply::empty();
    for entry in entries {
        let entry = entry.map_err(|e| ShellError::from_io(e, &location))?;
        reply = reply.line(Tone::Plain, entry.file_name().to_string_lossy());
    }

    if reply.lines.is_empty() {
        return Ok(Reply::notice(EMPTY_LISTING));
    }
    Ok(reply)
}

/// Change the current location.
pub fn cd(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    let target = cmd.expect_one()?;
    let resolved = ctx.resolve(target).inspect_err(|e| deny_debug(ctx, e))?;

    let metadata = fs::metadata(&resolved).map_err(|e| ShellError::from_io(e, target))?;
    if !metadata.is_dir() {
        return Err(ShellError::NotADirectory(target.to_string()));
    }

    ctx.set_cwd(resolved);
    Ok(Reply::empty())
}

/// Create one directory; parents must already exist.
pub fn mkdir(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    let name = cmd.expect_one()?;
    let resolved = ctx.resolve(name).inspect_err(|e| deny_debug(ctx, e))?;

    fs::create_dir(&resolved).map_err(|e| ShellError::from_io(e, name))?;
    Ok(Reply::success(format!("Folder '{}' created.", name)))
}

/// Print a file. Invalid UTF-8 is shown with replacement characters.
pub fn cat(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    let name = cmd.expect_one()?;
    let resolved = ctx.resolve(name).inspect_err(|e| deny_debug(ctx, e))?;

    let metadata = fs::metadata(&resolved).map_err(|e| ShellError::from_io(e, name))?;
    if metadata.is_dir() {
        return Err(ShellError::IsADirectory(name.to_string()));
    }

    let bytes = fs::read(&resolved).map_err(|e| ShellError::from_io(e, name))?;
    let text = String::from_utf8_lossy(&bytes);
    let body = text.strip_suffix('\n').unwrap_or(&text);

    if body.is_empty() {
        return Ok(Reply::empty());
    }
    Ok(Reply::plain(body))
}

pub(super) fn deny_debug(ctx: &ShellContext, err: &ShellError) {
    if err.is_access_denied() {
        output::debug(format!("denied from {}: {}", ctx.location(), err), ctx.verbosity);
    }
}
