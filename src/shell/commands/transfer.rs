//! shell::commands::transfer
//!
//! `upload` and `download`: the only commands that touch paths outside the
//! root. The outside path is checked for existence only; the inside path
//! always goes through the guard.

use std::fs::{self, File, FileTimes};
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use crate::core::config::expand_home;
use crate::shell::command::Command;
use crate::shell::context::ShellContext;
use crate::shell::errors::ShellError;
use crate::shell::reply::Reply;
use crate::ui::output;

use super::fs::deny_debug;

/// Copy an outside file into the current location, keeping its name,
/// permissions and timestamps.
pub fn upload(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    let raw = cmd.expect_one()?;
    let source = external_path(ctx, raw)?;

    if !source.is_file() {
        return Err(ShellError::SourceNotFound(raw.to_string()));
    }
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ShellError::SourceNotFound(raw.to_string()))?
        .to_string();

    let destination = ctx.resolve(&name).inspect_err(|e| deny_debug(ctx, e))?;
    if destination.is_dir() {
        return Err(ShellError::IsADirectory(name));
    }
    if same_file(&source, &destination) {
        return Err(ShellError::SameFile(raw.to_string()));
    }

    output::debug(
        format!("upload {} -> {}", source.display(), destination.display()),
        ctx.verbosity,
    );
    copy_preserving(&source, &destination).map_err(|e| ShellError::Io {
        context: format!("failed to upload '{}'", raw),
        source: e,
    })?;

    Ok(Reply::success(format!(
        "Uploaded '{}' to {}",
        name,
        ctx.location()
    )))
}

/// Copy a file from inside the root to the external directory.
pub fn download(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    let name = cmd.expect_one()?;
    let source = ctx.resolve(name).inspect_err(|e| deny_debug(ctx, e))?;

    let metadata = fs::metadata(&source).map_err(|e| ShellError::from_io(e, name))?;
    if metadata.is_dir() {
        return Err(ShellError::IsADirectory(name.to_string()));
    }

    // Named as typed, so a symlink lands under its own name.
    let file_name = Path::new(name)
        .file_name()
        .ok_or_else(|| ShellError::NotFound(name.to_string()))?;
    let destination = ctx.external_dir().join(file_name);
    if same_file(&source, &destination) {
        return Err(ShellError::SameFile(name.to_string()));
    }

    output::debug(
        format!("download {} -> {}", source.display(), destination.display()),
        ctx.verbosity,
    );
    fs::copy(&source, &destination).map_err(|e| ShellError::Io {
        context: format!("failed to write '{}'", destination.display()),
        source: e,
    })?;

    Ok(Reply::success(format!(
        "Downloaded '{}' to {}",
        name,
        destination.display()
    )))
}

/// Outside paths are taken as typed; relative ones are relative to the
/// external directory.
fn external_path(ctx: &ShellContext, raw: &str) -> Result<PathBuf, ShellError> {
    let expanded = expand_home(raw).map_err(|e| ShellError::Usage(e.to_string()))?;
    Ok(ctx.external_dir().join(expanded))
}

/// Both paths name one inode. A missing destination never matches.
fn same_file(a: &Path, b: &Path) -> bool {
    let identity = |p: &Path| -> io::Result<(u64, u64)> {
        let m = fs::metadata(p)?;
        Ok((m.dev(), m.ino()))
    };
    matches!((identity(a), identity(b)), (Ok(x), Ok(y)) if x == y)
}

/// `fs::copy` keeps permission bits; access and modification times are
/// copied explicitly.
fn copy_preserving(source: &Path, destination: &Path) -> std::io::Result<()> {
    fs::copy(source, destination)?;

    let metadata = fs::metadata(source)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    File::options()
        .write(true)
        .open(destination)?
        .set_times(times)
}
