//! Integration test module
//!
//! End-to-end tests for the HTTP API and the console flow.

pub mod common;
pub mod queue_tests;
