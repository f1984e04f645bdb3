//! Integration tests for `dashcore`
//!
//! This crate contains black-box tests that drive commands through the
//! runtime and the async dispatcher and check the resulting state and events.

// This is a test-only crate
#![cfg(test)]
