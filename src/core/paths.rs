//! core::paths
//!
//! Path confinement for the shell root.
//!
//! # Architecture
//!
//! Every filesystem-touching command resolves its user-supplied path through
//! [`PathGuard::resolve`] before acting on it. The guard owns the canonical
//! root and is the only place that decides whether a path is "inside".
//!
//! **Hard rule:** No command may touch the filesystem with a path that did
//! not come out of `PathGuard::resolve`. The two sanctioned crossings are the
//! source of `upload` and the destination of `download`, which live outside
//! the root by definition.
//!
//! # Resolution
//!
//! Resolution walks the joined path one component at a time:
//! - `.` is dropped
//! - `..` pops the last resolved component
//! - an existing symlink is replaced by its canonical target
//! - a component that does not exist yet is appended as-is
//!
//! Because symlinks are expanded as they are met, a later `..` steps out of
//! the link target, not out of the link's parent. This matches what the
//! kernel does when the path is finally opened.
//!
//! # Example
//!
//! ```no_run
//! use jailsh::core::paths::PathGuard;
//! use std::path::Path;
//!
//! let guard = PathGuard::prepare(Path::new("/srv/jail")).unwrap();
//! let docs = guard.resolve(guard.root(), "docs").unwrap();
//! assert!(docs.starts_with(guard.root()));
//!
//! assert!(guard.resolve(guard.root(), "../etc/passwd").is_err());
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Errors from path confinement.
#[derive(Debug, Error)]
pub enum PathError {
    /// The resolved path lies outside the root.
    #[error("access denied: '{0}' is outside the root directory")]
    AccessDenied(String),

    /// The root directory could not be created or opened.
    #[error("root directory '{path}' is not accessible: {source}")]
    RootUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The root exists but is not a directory.
    #[error("root '{0}' is not a directory")]
    RootNotDirectory(PathBuf),
}

/// Confinement-checking path resolver.
///
/// # Invariants
///
/// - `root` is absolute and canonical (no symlinks, no `.`/`..`)
/// - Every path returned by [`resolve`](Self::resolve) equals `root` or has
///   `root` as a component-wise prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for an existing root directory.
    ///
    /// The root is canonicalized so later prefix checks compare real paths.
    pub fn new(root: &Path) -> Result<Self, PathError> {
        let canonical = fs::canonicalize(root).map_err(|e| PathError::RootUnavailable {
            path: root.to_path_buf(),
            source: e,
        })?;

        if !canonical.is_dir() {
            return Err(PathError::RootNotDirectory(canonical));
        }

        // A root we cannot list is as good as missing.
        fs::read_dir(&canonical).map_err(|e| PathError::RootUnavailable {
            path: canonical.clone(),
            source: e,
        })?;

        Ok(Self { root: canonical })
    }

    /// Create the root directory if needed, then build a guard for it.
    pub fn prepare(root: &Path) -> Result<Self, PathError> {
        fs::create_dir_all(root).map_err(|e| PathError::RootUnavailable {
            path: root.to_path_buf(),
            source: e,
        })?;
        Self::new(root)
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether an already-resolved path is inside the root.
    ///
    /// `Path::starts_with` compares whole components, so `/jail2` is not
    /// considered inside `/jail`.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Resolve `input` against `base` and confine the result to the root.
    ///
    /// An empty `input` resolves to `base` itself. Absolute inputs replace
    /// `base` entirely, exactly as [`Path::join`] does.
    ///
    /// # Errors
    ///
    /// [`PathError::AccessDenied`] if the result is outside the root, or if
    /// a dangling symlink is met on the way.
    pub fn resolve(&self, base: &Path, input: &str) -> Result<PathBuf, PathError> {
        let joined = base.join(input);
        let mut resolved = PathBuf::new();

        for component in joined.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    resolved.push(component.as_os_str());
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(name) => {
                    resolved.push(name);
                    resolved = follow_symlink(resolved, input)?;
                }
            }
        }

        if self.contains(&resolved) {
            Ok(resolved)
        } else {
            Err(PathError::AccessDenied(input.to_string()))
        }
    }

    /// Render a path inside the root as `/relative/path`.
    ///
    /// The root itself renders as `/`. Paths outside the root render as
    /// their full display form.
    pub fn display_relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => {
                let parts: Vec<String> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                format!("/{}", parts.join("/"))
            }
            Err(_) => path.display().to_string(),
        }
    }
}

/// Replace `path` with its canonical target when it is a symlink.
fn follow_symlink(path: PathBuf, input: &str) -> Result<PathBuf, PathError> {
    match fs::symlink_metadata(&path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(&path).map_err(|_| PathError::AccessDenied(input.to_string()))
        }
        _ => Ok(path),
    }
}
