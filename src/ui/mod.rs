//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`banner`] - Startup header and session status panel
//!
//! # Design
//!
//! Command handlers never print. All output goes through this module so
//! that quiet and debug modes are honored in one place.

pub mod banner;
pub mod output;
