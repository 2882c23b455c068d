//! IDE feature tests
//!
//! Tests for:
//! - Quick fixes for unused-code diagnostics

pub mod tests_code_actions;
