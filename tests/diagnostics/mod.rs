//! Diagnostics coordinator tests
//!
//! Tests for:
//! - Debounced runs, ordering, and publish-on-change
//! - Kind merging and producer failures
//! - Staleness, supersession and interruption
//! - On-demand requests and teardown
//! - Settings toggles and build results

pub mod tests_provider;
pub mod tests_settings_and_build;
