//! jailsh - an interactive shell confined to one directory
//!
//! jailsh offers a small set of file and process commands (list, change
//! directory, make directory, read, upload, download, clone, run, install)
//! whose every filesystem access is confined to a root directory, behind an
//! optional remote login.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (flags, config, startup)
//! - [`shell`] - Parsing, gating and executing shell commands; the loop
//! - [`session`] - Remote login and the persisted session credential
//! - [`core`] - Configuration and path confinement
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. Every path a command touches inside the root is resolved by
//!    [`core::paths::PathGuard`], and nothing it returns lies outside
//! 2. Only `help`, `clear`, `exit` and `login` run without a session
//! 3. A failing command never ends the shell
//! 4. Session cookies never appear in output, logs or debug formatting

pub mod cli;
pub mod core;
pub mod session;
pub mod shell;
pub mod ui;
