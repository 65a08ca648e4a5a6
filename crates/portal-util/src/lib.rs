//! Shared utilities for the portal block puller.
//!
//! This crate provides cross-cutting concerns used by all other portal crates:
//! error types, filesystem helpers, process spawning, and terminal progress
//! indicators.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
