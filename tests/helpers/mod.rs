//! Shared test helpers.

pub mod fakes;
pub mod lint_helpers;
pub mod source_fixtures;
