//! shell::gate
//!
//! Authentication gating for command execution.
//!
//! # Architecture
//!
//! Every verb declares a [`Requirement`]. Gating runs before argument
//! validation, so an unauthenticated `cd` with no argument reports the
//! missing login, not the missing argument.
//!
//! # Invariants
//!
//! - Only the verbs in [`PUBLIC`] run without a session
//! - Unrecognized input is gated like any other command
//! - Gating is a pure function of the verb and the session state

use super::command::{Input, Verb};
use super::errors::ShellError;

/// What a verb needs before it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Runs in any state.
    None,
    /// Requires an authenticated session.
    Session,
}

/// Verbs that run without a session.
pub const PUBLIC: &[Verb] = &[Verb::Help, Verb::Clear, Verb::Exit, Verb::Login];

impl Verb {
    /// The requirement this verb declares.
    pub fn requirement(self) -> Requirement {
        if PUBLIC.contains(&self) {
            Requirement::None
        } else {
            Requirement::Session
        }
    }
}

/// Check a parsed line against the session state.
///
/// Blank input always passes.
///
/// # Errors
///
/// [`ShellError::NotAuthenticated`] naming the offending verb.
pub fn gate(input: &Input, authenticated: bool) -> Result<(), ShellError> {
    let (requirement, name) = match input {
        Input::Blank => return Ok(()),
        Input::Known(cmd) => (cmd.verb.requirement(), cmd.verb.name().to_string()),
        Input::Unknown(raw) => (
            Requirement::Session,
            raw.split_whitespace().next().unwrap_or(raw).to_string(),
        ),
    };

    match requirement {
        Requirement::Session if !authenticated => Err(ShellError::NotAuthenticated(name)),
        _ => Ok(()),
    }
}
