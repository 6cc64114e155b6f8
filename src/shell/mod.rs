//! shell - the confined command shell
//!
//! # Architecture
//!
//! Each input line flows through:
//!
//! ```text
//! command::parse → gate::gate → commands::dispatch → Reply → ui::output::render
//! ```
//!
//! - [`command`] - Tokenizing lines into a [`Verb`] and arguments
//! - [`gate`] - Deciding which verbs need a session
//! - [`commands`] - One handler per verb
//! - [`context`] - [`ShellContext`], the state handlers operate on
//! - [`repl`] - The loop that reads lines and renders replies
//!
//! # Invariants
//!
//! - Every filesystem path a handler touches inside the root has been
//!   resolved by the [`PathGuard`](crate::core::paths::PathGuard)
//! - A handler error never ends the loop

pub mod command;
pub mod commands;
pub mod context;
mod errors;
pub mod gate;
pub mod repl;
pub mod reply;

pub use command::{Command, Input, Verb};
pub use context::{ShellContext, Tools};
pub use errors::ShellError;
pub use repl::Shell;
pub use reply::{Flow, Reply, Tone};
