//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-process relay fixture with simulated client connections
//! - Event assertion helpers

pub mod assertions;
pub mod harness;

// Re-export commonly used utilities
pub use assertions::*;
pub use harness::*;
