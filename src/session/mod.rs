//! session - remote login and persisted session state
//!
//! # Architecture
//!
//! The session layer:
//! - Exchanges a username/password for session cookies at the login endpoint
//! - Persists the cookies as a versioned [`CredentialRecord`]
//! - Restores a persisted record on startup by asking the profile endpoint
//!   whether it is still valid
//! - Never exposes cookie values in logs, errors, or debug output
//!
//! # Components
//!
//! - [`CredentialRecord`] - JSON schema for the stored cookies
//! - [`CredentialStore`] - Atomic, owner-only credential file
//! - [`AuthApi`] - Trait over the remote endpoints
//! - [`HttpAuthClient`] - `reqwest` implementation of `AuthApi`
//! - [`SessionStore`] - Owns the in-memory session and ties the above together
//!
//! # Trust model
//!
//! Once a credential has been accepted by `login` or `restore`, the session
//! stays authenticated until `logout`. Gated commands do not re-check the
//! profile endpoint.
//!
//! # Example
//!
//! ```ignore
//! use jailsh::session::{CredentialStore, HttpAuthClient, SessionStore};
//!
//! let api = HttpAuthClient::new(login_url, profile_url, "success", timeout)?;
//! let mut session = SessionStore::new(Box::new(api), CredentialStore::new(path));
//!
//! if session.restore().await.is_none() {
//!     session.login("alice", "hunter2").await?;
//! }
//! assert!(session.is_authenticated());
//! ```

pub mod client;
pub mod credential;
mod errors;
pub mod mock;
pub mod store;

pub use client::{AuthApi, HttpAuthClient, UserProfile};
pub use credential::{CredentialRecord, SessionCookie, CREDENTIAL_KIND, CREDENTIAL_VERSION};
pub use errors::AuthError;
pub use store::{CredentialError, CredentialStore};

use std::fmt;
use std::path::Path;

/// In-memory session state.
#[derive(Debug, Clone, Default)]
struct Session {
    credential: Option<CredentialRecord>,
    profile: Option<UserProfile>,
}

/// Owner of the authentication state.
///
/// # Invariants
///
/// - `is_authenticated()` is true iff a credential was accepted by
///   [`login`](Self::login) or [`restore`](Self::restore)
/// - The credential file is written only after a successful login and
///   removed only by [`logout`](Self::logout)
pub struct SessionStore {
    api: Box<dyn AuthApi>,
    store: CredentialStore,
    session: Session,
}

impl SessionStore {
    /// Create an unauthenticated session store.
    pub fn new(api: Box<dyn AuthApi>, store: CredentialStore) -> Self {
        Self {
            api,
            store,
            session: Session::default(),
        }
    }

    /// Log in with a username and password.
    ///
    /// On success the credential is persisted before the profile is fetched.
    /// If the profile endpoint fails afterwards the session still counts as
    /// authenticated, with a profile carrying only the username.
    ///
    /// # Errors
    ///
    /// Any [`AuthError`] from the login endpoint or from persisting the
    /// credential. The session is left unchanged on error.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        let credential = self.api.login(username, password).await?;
        self.store.save(&credential)?;

        let profile = self
            .api
            .profile(&credential)
            .await
            .unwrap_or_else(|_| UserProfile::named(username));

        self.session = Session {
            credential: Some(credential),
            profile: Some(profile.clone()),
        };
        Ok(profile)
    }

    /// Restore a persisted session, reporting why it failed.
    ///
    /// The in-memory session changes only on success.
    pub async fn try_restore(&mut self) -> Result<UserProfile, AuthError> {
        let credential = self.store.load()?.ok_or(AuthError::NotAuthenticated)?;

        if credential.is_expired() {
            return Err(AuthError::Expired);
        }

        let profile = self.api.profile(&credential).await?;
        self.session = Session {
            credential: Some(credential),
            profile: Some(profile.clone()),
        };
        Ok(profile)
    }

    /// Restore a persisted session.
    ///
    /// Every failure (missing or corrupt file, expired record, endpoint
    /// error) means "not logged in" and yields `None`.
    pub async fn restore(&mut self) -> Option<UserProfile> {
        self.try_restore().await.ok()
    }

    /// Forget the session and delete the credential file.
    ///
    /// The in-memory session is cleared even if the file cannot be deleted.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session = Session::default();
        self.store.clear()?;
        Ok(())
    }

    /// Check whether a credential has been accepted.
    pub fn is_authenticated(&self) -> bool {
        self.session.credential.is_some()
    }

    /// Get the cached profile.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.session.profile.as_ref()
    }

    /// Get the credential file path.
    pub fn credential_path(&self) -> &Path {
        self.store.path()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("store", &self.store)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
