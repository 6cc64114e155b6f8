//! session::store
//!
//! File-backed persistence for the session credential.
//!
//! # Security
//!
//! - The file lives relative to the process working directory, never inside
//!   the shell root (commands inside the jail cannot read it)
//! - File permissions are set to 0600 on Unix (owner read/write only)
//! - All writes are atomic (write to temp file, then rename)
//! - Cookie values are never included in error messages
//!
//! # Example
//!
//! ```ignore
//! use jailsh::session::{CredentialStore, CredentialRecord};
//!
//! let store = CredentialStore::new("jailsh-session.json".into());
//! store.save(&record)?;
//!
//! if let Some(record) = store.load()? {
//!     // Attach record.cookie_header() to requests...
//! }
//! ```

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use thiserror::Error;

use super::credential::CredentialRecord;

/// Errors from credential file operations.
///
/// Note: Error messages intentionally do not include cookie values.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Failed to read or parse the credential file.
    #[error("failed to read credential file: {0}")]
    ReadError(String),

    /// Failed to write the credential file.
    #[error("failed to write credential file: {0}")]
    WriteError(String),

    /// Failed to delete the credential file.
    #[error("failed to delete credential file: {0}")]
    DeleteError(String),
}

/// Credential file at a fixed path.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    /// Path to the credential file
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store for the given file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the path to the credential file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record.
    ///
    /// Returns `Ok(None)` if no file exists.
    pub fn load(&self) -> Result<Option<CredentialRecord>, CredentialError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CredentialError::ReadError(format!(
                    "cannot read credential file: {}",
                    e
                )))
            }
        };

        CredentialRecord::parse(&content)
            .map(Some)
            .map_err(|e| CredentialError::ReadError(format!("cannot parse credential file: {}", e)))
    }

    /// Persist a record, replacing any previous one.
    pub fn save(&self, record: &CredentialRecord) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CredentialError::WriteError(format!("cannot create directory: {}", e))
                })?;
            }
        }

        let content = record
            .to_json()
            .map_err(|e| CredentialError::WriteError(format!("cannot serialize record: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| {
                    CredentialError::WriteError(format!("cannot create temp file: {}", e))
                })?;

            // Restrict permissions before the cookies hit the disk
            #[cfg(unix)]
            {
                let permissions = fs::Permissions::from_mode(0o600);
                file.set_permissions(permissions).map_err(|e| {
                    CredentialError::WriteError(format!("cannot set permissions: {}", e))
                })?;
            }

            file.write_all(content.as_bytes())
                .map_err(|e| CredentialError::WriteError(format!("cannot write record: {}", e)))?;

            file.sync_all()
                .map_err(|e| CredentialError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| CredentialError::WriteError(format!("cannot rename temp file: {}", e)))?;

        Ok(())
    }

    /// Delete the credential file.
    ///
    /// Returns `Ok(())` even if the file did not exist.
    pub fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::DeleteError(e.to_string())),
        }
    }
}
