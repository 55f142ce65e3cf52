//! Property-based tests using proptest
//!
//! Tests mathematical identities and invariants of the calculator.

pub mod metrics_tests;
pub mod conversion_tests;
