//! Dependency reconciliation engine: npm-style range intersection, recursive
//! flattening of block dependencies, and classification of block dependencies
//! against a host project's.
//!
//! Everything here is synchronous and free of I/O except
//! [`merge::FsManifestResolver`], which reads `package.json` files.

pub mod classify;
pub mod conflict;
pub mod merge;
pub mod range;
pub mod reconcile;

pub use portal_core::manifest::DependencyMap;
