//! core
//!
//! Configuration and path confinement.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Resolving user paths without leaving the root
//!
//! # Design Principles
//!
//! - Schemas are strict and validated on load
//! - Confinement checks compare real, canonical paths

pub mod config;
pub mod paths;
