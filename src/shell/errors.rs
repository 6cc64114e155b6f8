//! shell::errors
//!
//! Error taxonomy for command handling.
//!
//! Every variant is an expected, per-command failure: the loop renders it as
//! one line and keeps reading input.

use std::io;

use thiserror::Error;

use crate::core::paths::PathError;
use crate::session::AuthError;

/// Errors from parsing or executing one command.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The path resolves outside the root.
    #[error("access denied: '{0}' is outside the root directory")]
    AccessDenied(String),

    /// Login failed.
    #[error("login failed: {0}")]
    Auth(#[from] AuthError),

    /// A gated command was issued without a session.
    #[error("please login first to use '{0}'")]
    NotAuthenticated(String),

    /// Malformed arguments.
    #[error("usage: {0}")]
    Usage(String),

    /// A required argument is empty or missing.
    #[error("missing argument: {0}")]
    MissingArgument(String),

    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("is a directory: {0}")]
    IsADirectory(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The external file to upload is missing or not a regular file.
    #[error("source file does not exist: {0}")]
    SourceNotFound(String),

    /// A copy whose source and destination are one file.
    #[error("'{0}': source and destination are the same file")]
    SameFile(String),

    /// The target of `run` has no registered interpreter.
    #[error("'{name}' is not a runnable script (expected extension: {expected})")]
    WrongExtension { name: String, expected: String },

    /// An external tool could not be started or exited with failure.
    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Any other filesystem error.
    #[error("{context}: {source}")]
    Io {
        context: String,
        source: io::Error,
    },

    /// Root setup failure surfaced through a command.
    #[error(transparent)]
    Path(PathError),
}

impl ShellError {
    /// Map an I/O error on `name` to the closest taxonomy variant.
    pub fn from_io(err: io::Error, name: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ShellError::NotFound(name.to_string()),
            io::ErrorKind::AlreadyExists => ShellError::AlreadyExists(name.to_string()),
            _ => ShellError::Io {
                context: name.to_string(),
                source: err,
            },
        }
    }

    /// Check if this error is a confinement violation.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ShellError::AccessDenied(_))
    }
}

impl From<PathError> for ShellError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::AccessDenied(input) => ShellError::AccessDenied(input),
            other => ShellError::Path(other),
        }
    }
}
