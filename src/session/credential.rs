//! session::credential
//!
//! Versioned record of the session cookies issued by the login endpoint.
//!
//! # Design
//!
//! The record stores:
//! - kind, schema_version
//! - cookies (name, value)
//! - issued_at, expires_at
//!
//! `parse` refuses records with an unknown kind or schema version, so a file
//! written by a different tool or a future format is treated as "not logged
//! in" rather than half-understood.
//!
//! # Security
//!
//! Cookie values are the session credential. `Debug` redacts them; only the
//! JSON form written to the credential file carries them.
//!
//! # Example
//!
//! ```
//! use jailsh::session::{CredentialRecord, SessionCookie};
//!
//! let record = CredentialRecord::new(vec![SessionCookie::new("PHPSESSID", "abc123")], None);
//! assert_eq!(record.cookie_header(), "PHPSESSID=abc123");
//! assert!(!format!("{:?}", record).contains("abc123"));
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::AuthError;

/// Kind identifier for credential records.
pub const CREDENTIAL_KIND: &str = "jailsh.session";

/// Current schema version for credential records.
pub const CREDENTIAL_VERSION: u32 = 1;

/// Persisted session credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Record type identifier.
    pub kind: String,

    /// Schema version for forward compatibility.
    pub schema_version: u32,

    /// Cookies set by the login endpoint.
    pub cookies: Vec<SessionCookie>,

    /// When the login succeeded.
    pub issued_at: DateTime<Utc>,

    /// When the earliest cookie expires, if the server said so.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A single `name=value` session cookie.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    /// Create a cookie.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse a `Set-Cookie` header value.
    ///
    /// Returns the cookie and its `Max-Age` in seconds, if present.
    /// Returns `None` for malformed headers.
    pub fn parse_set_cookie(header: &str) -> Option<(Self, Option<i64>)> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let max_age = parts.find_map(|attr| {
            let (key, val) = attr.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("max-age") {
                val.trim().parse::<i64>().ok()
            } else {
                None
            }
        });

        Some((Self::new(name, value.trim()), max_age))
    }
}

impl CredentialRecord {
    /// Create a new record issued now.
    ///
    /// `max_age_secs` is the lifetime the server attached to the cookies.
    pub fn new(cookies: Vec<SessionCookie>, max_age_secs: Option<i64>) -> Self {
        let now = Utc::now();
        Self {
            kind: CREDENTIAL_KIND.to_string(),
            schema_version: CREDENTIAL_VERSION,
            cookies,
            issued_at: now,
            expires_at: max_age_secs.map(|secs| now + Duration::seconds(secs)),
        }
    }

    /// Build a record from the `Set-Cookie` headers of a login response.
    ///
    /// Cookies with a non-positive `Max-Age` are deletions and are skipped.
    /// A later cookie with the same name replaces an earlier one.
    pub fn from_set_cookie_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut cookies: Vec<SessionCookie> = Vec::new();
        let mut shortest: Option<i64> = None;

        for header in headers {
            let Some((cookie, max_age)) = SessionCookie::parse_set_cookie(header) else {
                continue;
            };
            if matches!(max_age, Some(age) if age <= 0) {
                cookies.retain(|c| c.name != cookie.name);
                continue;
            }
            if let Some(age) = max_age {
                shortest = Some(shortest.map_or(age, |s| s.min(age)));
            }
            cookies.retain(|c| c.name != cookie.name);
            cookies.push(cookie);
        }

        Self::new(cookies, shortest)
    }

    /// Render the cookies as a `Cookie` request header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Check if the record has passed its expiry.
    ///
    /// Records without an expiry never expire client-side; the profile
    /// endpoint remains the authority.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }

    /// Parse a credential record from JSON.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` if parsing fails or the
    /// kind/version is not recognized.
    pub fn parse(json: &str) -> Result<Self, AuthError> {
        let record: Self = serde_json::from_str(json)?;

        if record.kind != CREDENTIAL_KIND {
            return Err(AuthError::InvalidCredential(format!(
                "unexpected kind '{}', expected '{}'",
                record.kind, CREDENTIAL_KIND
            )));
        }

        if record.schema_version != CREDENTIAL_VERSION {
            return Err(AuthError::InvalidCredential(format!(
                "unsupported schema version {}, expected {}",
                record.schema_version, CREDENTIAL_VERSION
            )));
        }

        Ok(record)
    }

    /// Serialize the record to JSON.
    pub fn to_json(&self) -> Result<String, AuthError> {
        serde_json::to_string_pretty(self).map_err(|e| AuthError::InvalidCredential(e.to_string()))
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("kind", &self.kind)
            .field("schema_version", &self.schema_version)
            .field("cookies", &self.cookies)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}
