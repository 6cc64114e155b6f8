//! session::client
//!
//! HTTP client for the remote login and profile endpoints.
//!
//! # Protocol
//!
//! - Login: `POST` form-encoded `username`/`password`. Success requires a
//!   2xx status and the success marker somewhere in the body (matched
//!   case-insensitively). The `Set-Cookie` headers are the credential.
//! - Profile: `GET` with the credential as a `Cookie` header. The JSON body
//!   is `{"status": "success", "profile": {...}}`.
//!
//! # Example
//!
//! ```ignore
//! use jailsh::session::{AuthApi, HttpAuthClient};
//!
//! let client = HttpAuthClient::new(login_url, profile_url, "success", timeout)?;
//! let credential = client.login("alice", "hunter2").await?;
//! let profile = client.profile(&credential).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, COOKIE, SET_COOKIE, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::credential::CredentialRecord;
use super::errors::AuthError;

/// User-Agent header for requests.
const CLIENT_USER_AGENT: &str = "jailsh";

/// Profile returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Login name.
    pub username: String,

    /// Email address, if the server reports one.
    #[serde(default)]
    pub email: Option<String>,

    /// Any other profile fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// A profile carrying only the login name.
    pub fn named(username: &str) -> Self {
        Self {
            username: username.to_string(),
            email: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Body of the profile endpoint.
#[derive(Debug, Deserialize)]
struct ProfileResponse {
    status: String,
    profile: Option<UserProfile>,
}

/// Form body for the login endpoint.
#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

/// Remote authentication API.
///
/// Implemented by [`HttpAuthClient`] for real endpoints and by
/// [`MockAuthApi`](super::mock::MockAuthApi) for tests.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange a username and password for a session credential.
    ///
    /// # Errors
    ///
    /// - [`AuthError::HttpStatus`] on a non-success status
    /// - [`AuthError::Rejected`] if the body lacks the success marker
    /// - [`AuthError::Network`] on any transport failure
    async fn login(&self, username: &str, password: &str) -> Result<CredentialRecord, AuthError>;

    /// Fetch the profile for a session credential.
    ///
    /// # Errors
    ///
    /// - [`AuthError::HttpStatus`] on a non-success status
    /// - [`AuthError::Profile`] if the body does not confirm the session
    /// - [`AuthError::Network`] on any transport failure
    async fn profile(&self, credential: &CredentialRecord) -> Result<UserProfile, AuthError>;
}

/// Client for the remote login/profile endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    /// HTTP client.
    client: Client,

    /// Login endpoint URL.
    login_url: String,

    /// Profile endpoint URL.
    profile_url: String,

    /// Lowercased success marker.
    success_marker: String,
}

impl HttpAuthClient {
    /// Create a client.
    ///
    /// `timeout` bounds every request, including connection setup.
    pub fn new(
        login_url: &str,
        profile_url: &str,
        success_marker: &str,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AuthError::from)?;

        Ok(Self {
            client,
            login_url: login_url.to_string(),
            profile_url: profile_url.to_string(),
            success_marker: success_marker.to_lowercase(),
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn login(&self, username: &str, password: &str) -> Result<CredentialRecord, AuthError> {
        let response = self
            .client
            .post(&self.login_url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .form(&LoginForm { username, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::HttpStatus {
                endpoint: "login",
                status: status.as_u16(),
            });
        }

        let record = CredentialRecord::from_set_cookie_headers(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );

        let body = response.text().await?;
        if !body.to_lowercase().contains(&self.success_marker) {
            return Err(AuthError::Rejected);
        }

        Ok(record)
    }

    async fn profile(&self, credential: &CredentialRecord) -> Result<UserProfile, AuthError> {
        let cookie = HeaderValue::from_str(&credential.cookie_header())
            .map_err(|_| AuthError::InvalidCredential("cookie is not a valid header".into()))?;

        let response = self
            .client
            .get(&self.profile_url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/json")
            .header(COOKIE, cookie)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::HttpStatus {
                endpoint: "profile",
                status: status.as_u16(),
            });
        }

        let body: ProfileResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Profile(format!("malformed response: {}", e.without_url())))?;

        match (body.status.as_str(), body.profile) {
            ("success", Some(profile)) => Ok(profile),
            ("success", None) => Err(AuthError::Profile("response has no profile".into())),
            (other, _) => Err(AuthError::Profile(format!("status '{}'", other))),
        }
    }
}
