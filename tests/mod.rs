//! Test suite for the ripplechat relay
//!
//! This module organizes all tests

pub mod common;
pub mod integration;
pub mod property;
