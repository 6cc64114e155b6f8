//! shell::context
//!
//! The state every command handler sees.
//!
//! # Ownership
//!
//! [`ShellContext`] owns the root guard, the current location, the session
//! store and the runtime that drives its network calls. There is one
//! context per shell process and nothing about it is global.
//!
//! # Invariants
//!
//! - `cwd` is always inside the root; only `cd` assigns it, and only to a
//!   path the guard has resolved
//! - The root never changes after construction

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::runtime::{Builder, Runtime};

use crate::core::config::Config;
use crate::core::paths::PathGuard;
use crate::session::{AuthError, SessionStore, UserProfile};
use crate::ui::output::Verbosity;

use super::errors::ShellError;

/// External programs used by `git clone`, `run` and `install`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    /// Version control client.
    pub git: String,
    /// Package manager argv prefix; the package name is appended.
    pub install: Vec<String>,
    /// Script extension (no dot) to interpreter program.
    pub interpreters: BTreeMap<String, String>,
}

impl Tools {
    /// Tools as configured.
    pub fn from_config(config: &Config) -> Self {
        Self {
            git: config.git_program().to_string(),
            install: config.install_command(),
            interpreters: config.interpreters(),
        }
    }

    /// Look up the interpreter for a script path by extension.
    pub fn interpreter_for(&self, script: &Path) -> Option<&str> {
        let ext = script.extension()?.to_str()?;
        self.interpreters.get(ext).map(String::as_str)
    }

    /// Registered extensions, for error messages (e.g. ".py, .sh").
    pub fn known_extensions(&self) -> String {
        self.interpreters
            .keys()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Mutable state of one shell session.
pub struct ShellContext {
    guard: PathGuard,
    cwd: PathBuf,
    external_dir: PathBuf,
    session: SessionStore,
    pub tools: Tools,
    pub verbosity: Verbosity,
    runtime: Runtime,
}

impl ShellContext {
    /// Create a context positioned at the root.
    ///
    /// `external_dir` is where `download` writes; it is the process working
    /// directory in normal use.
    ///
    /// # Errors
    ///
    /// [`ShellError::Io`] if the async runtime cannot be started.
    pub fn new(
        guard: PathGuard,
        external_dir: PathBuf,
        session: SessionStore,
        tools: Tools,
        verbosity: Verbosity,
    ) -> Result<Self, ShellError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| ShellError::Io {
                context: "failed to start async runtime".to_string(),
                source,
            })?;

        Ok(Self {
            cwd: guard.root().to_path_buf(),
            guard,
            external_dir,
            session,
            tools,
            verbosity,
            runtime,
        })
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Current location, always inside the root.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Directory outside the root used as the `download` destination.
    pub fn external_dir(&self) -> &Path {
        &self.external_dir
    }

    /// Resolve a user path against the current location.
    pub fn resolve(&self, input: &str) -> Result<PathBuf, ShellError> {
        self.guard.resolve(&self.cwd, input).map_err(ShellError::from)
    }

    /// Move to a directory the guard has already resolved.
    pub(crate) fn set_cwd(&mut self, path: PathBuf) {
        debug_assert!(self.guard.contains(&path));
        self.cwd = path;
    }

    /// Current location rendered relative to the root ("/" or "/a/b").
    pub fn location(&self) -> String {
        self.guard.display_relative(&self.cwd)
    }

    /// The interactive prompt.
    pub fn prompt(&self) -> String {
        format!("root@jailsh {}> ", self.location())
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Log in, blocking until the remote endpoints answer.
    pub fn login(&mut self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        self.runtime.block_on(self.session.login(username, password))
    }

    /// Restore a persisted session, reporting why it failed.
    pub fn try_restore(&mut self) -> Result<UserProfile, AuthError> {
        self.runtime.block_on(self.session.try_restore())
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session.logout()
    }
}

impl std::fmt::Debug for ShellContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellContext")
            .field("root", &self.guard.root())
            .field("cwd", &self.cwd)
            .field("external_dir", &self.external_dir)
            .field("session", &self.session)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}
