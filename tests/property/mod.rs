//! Property-based tests
//!
//! Uses proptest to generate random inputs and verify invariants

pub mod channel_proptest;
pub mod event_proptest;
pub mod presence_proptest;
