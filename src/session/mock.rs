//! session::mock
//!
//! Mock authentication API for deterministic testing.
//!
//! # Design
//!
//! The mock keeps a user table and a set of live session ids in memory.
//! Clones share state, so a test can hand one clone to a
//! [`SessionStore`](super::SessionStore) and keep another to revoke
//! sessions, take the server offline, or inspect recorded calls.
//!
//! # Example
//!
//! ```
//! use jailsh::session::mock::MockAuthApi;
//! use jailsh::session::AuthApi;
//!
//! # tokio_test_block_on(async {
//! let api = MockAuthApi::new().with_user("alice", "hunter2", Some("alice@example.com"));
//!
//! let credential = api.login("alice", "hunter2").await.unwrap();
//! let profile = api.profile(&credential).await.unwrap();
//! assert_eq!(profile.username, "alice");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::client::{AuthApi, UserProfile};
use super::credential::{CredentialRecord, SessionCookie};
use super::errors::AuthError;

/// Cookie name the mock issues.
pub const MOCK_COOKIE: &str = "MOCKSESSID";

/// Mock authentication API.
#[derive(Debug, Clone, Default)]
pub struct MockAuthApi {
    inner: Arc<Mutex<MockAuthInner>>,
}

#[derive(Debug, Default)]
struct MockAuthInner {
    /// Username to (password, profile).
    users: HashMap<String, (String, UserProfile)>,
    /// Live session id to username.
    sessions: HashMap<String, String>,
    /// Next session id.
    next_session: u64,
    /// Lifetime attached to issued cookies.
    max_age: Option<i64>,
    /// Simulate an unreachable server.
    offline: bool,
    /// Make the profile endpoint fail while login still works.
    profile_broken: bool,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Login { username: String },
    Profile { session: Option<String> },
}

impl MockAuthApi {
    /// Create an empty mock with no users.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockAuthInner> {
        // A poisoned mock only means another test thread panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a user.
    pub fn with_user(self, username: &str, password: &str, email: Option<&str>) -> Self {
        let mut profile = UserProfile::named(username);
        profile.email = email.map(str::to_string);
        self.lock()
            .users
            .insert(username.to_string(), (password.to_string(), profile));
        self
    }

    /// Attach a `Max-Age` to issued cookies.
    pub fn with_max_age(self, secs: i64) -> Self {
        self.lock().max_age = Some(secs);
        self
    }

    /// Simulate the server being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Make the profile endpoint fail.
    pub fn set_profile_broken(&self, broken: bool) {
        self.lock().profile_broken = broken;
    }

    /// Invalidate every issued session (server-side expiry).
    pub fn revoke_all(&self) {
        self.lock().sessions.clear();
    }

    /// Get recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, username: &str, password: &str) -> Result<CredentialRecord, AuthError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::Login {
            username: username.to_string(),
        });

        if inner.offline {
            return Err(AuthError::Network("connection refused".into()));
        }

        match inner.users.get(username) {
            Some((expected, _)) if expected == password => {}
            _ => return Err(AuthError::Rejected),
        }

        inner.next_session += 1;
        let session_id = format!("mock-{}", inner.next_session);
        inner
            .sessions
            .insert(session_id.clone(), username.to_string());

        Ok(CredentialRecord::new(
            vec![SessionCookie::new(MOCK_COOKIE, session_id)],
            inner.max_age,
        ))
    }

    async fn profile(&self, credential: &CredentialRecord) -> Result<UserProfile, AuthError> {
        let mut inner = self.lock();
        let session = credential
            .cookies
            .iter()
            .find(|c| c.name == MOCK_COOKIE)
            .map(|c| c.value.clone());
        inner.operations.push(MockOperation::Profile {
            session: session.clone(),
        });

        if inner.offline {
            return Err(AuthError::Network("connection refused".into()));
        }
        if inner.profile_broken {
            return Err(AuthError::HttpStatus {
                endpoint: "profile",
                status: 500,
            });
        }

        let username = session
            .and_then(|id| inner.sessions.get(&id).cloned())
            .ok_or_else(|| AuthError::Profile("status 'error'".into()))?;

        inner
            .users
            .get(&username)
            .map(|(_, profile)| profile.clone())
            .ok_or_else(|| AuthError::Profile("unknown user".into()))
    }
}
