//! Core data types for the portal block puller.
//!
//! This crate defines the types shared by every stage of a pull: the
//! `package.json` manifest of blocks and projects, the parsed block source
//! location, and the global configuration.
//!
//! This crate is intentionally free of async code and network I/O.

/// Manifest file name for both blocks and host projects.
pub const MANIFEST_FILE: &str = "package.json";

pub mod config;
pub mod manifest;
pub mod source;
