//! Lint engine tests
//!
//! Tests for:
//! - Each check firing on its trigger shape
//! - Shapes that must stay quiet
//! - End-to-end scenarios and output stability

pub mod tests_checks;
