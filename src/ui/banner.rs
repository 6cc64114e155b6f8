//! ui::banner
//!
//! The status panel shown at startup, after `clear`, and after login or
//! logout.

use crate::session::UserProfile;

/// Shown when nobody is logged in.
pub const LOGIN_HINT: &str = "Type login <username> <password> to begin";

/// Panel lines for the given session profile.
pub fn status_lines(profile: Option<&UserProfile>) -> Vec<String> {
    let Some(profile) = profile else {
        return vec![LOGIN_HINT.to_string()];
    };

    let mut lines = vec![format!("User:  {}", profile.username)];
    if let Some(email) = &profile.email {
        lines.push(format!("Email: {}", email));
    }
    lines
}

/// Startup header.
pub fn header(root_display: &str) -> String {
    format!(
        "jailsh {} - confined to {}",
        env!("CARGO_PKG_VERSION"),
        root_display
    )
}
