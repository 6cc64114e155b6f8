//! session::errors
//!
//! Authentication error types for the remote login.
//!
//! # Design
//!
//! Error messages never contain passwords or cookie values. Transport
//! failures of any kind (timeout, DNS, refused connection) collapse into
//! [`AuthError::Network`] so callers can report them as a failed login
//! instead of crashing.
//!
//! # Example
//!
//! ```
//! use jailsh::session::AuthError;
//!
//! let err = AuthError::Rejected;
//! assert!(err.to_string().contains("username/password"));
//! ```

use thiserror::Error;

/// Errors from authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential is stored or cached.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The login endpoint answered but did not report success.
    #[error("check username/password")]
    Rejected,

    /// An endpoint answered with a non-success HTTP status.
    #[error("{endpoint} endpoint returned HTTP {status}")]
    HttpStatus {
        /// Which endpoint ("login" or "profile")
        endpoint: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// The profile endpoint did not confirm the session.
    #[error("profile unavailable: {0}")]
    Profile(String),

    /// The stored credential is expired.
    #[error("stored session expired")]
    Expired,

    /// The stored credential record is invalid.
    #[error("invalid credential record: {0}")]
    InvalidCredential(String),

    /// Error from the credential file.
    #[error("credential store error: {0}")]
    Store(String),

    /// Network error talking to the remote endpoints.
    #[error("network error: {0}")]
    Network(String),
}

impl AuthError {
    /// Check if this error indicates a transient failure that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Network(_))
    }
}

impl From<super::store::CredentialError> for AuthError {
    fn from(err: super::store::CredentialError) -> Self {
        AuthError::Store(err.to_string())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        // Drop the URL: query strings may carry credentials.
        AuthError::Network(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::InvalidCredential(err.to_string())
    }
}
