//! Shared test utilities for the perspective workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`memory`]: [`MemoryApi`], an in-memory stand-in for the remote service
//! - [`fixtures`]: sample declarations and a [`TestWorkspace`] directory

pub mod fixtures;
pub mod memory;

pub use fixtures::TestWorkspace;
pub use memory::{MemoryApi, Request};
