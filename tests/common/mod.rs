//! Common test utilities and helpers
//!
//! This module provides shared functionality used across integration tests:
//! - Binary path resolution (via `get_cmext_binary`)
//! - Scripted command runner and fake `cmake` (via `helpers`)

pub(crate) mod helpers;

// Re-export get_cmext_binary for convenient access
#[allow(unused_imports)]
pub(crate) use helpers::get_cmext_binary;
