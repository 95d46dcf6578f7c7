//! Integration tests
//!
//! End-to-end behavior through the dispatch path: presence lifecycle,
//! message and reaction relay, document fan-out, and call signaling.

pub mod call_test;
pub mod document_test;
