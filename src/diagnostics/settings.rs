//! Client-facing diagnostics configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::lint::LintCode;

/// Diagnostics settings as sent by the client (`camelCase` JSON).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsSettings {
    /// Master switch for lint diagnostics.
    pub lint_enabled: bool,

    /// Individual lints switched off.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disabled_lints: Vec<LintCode>,

    /// Quiet period after the last change before pending files are analysed.
    pub debounce_ms: u64,

    /// Pause between two files of one run, to keep the host responsive.
    pub inter_file_delay_ms: u64,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            lint_enabled: true,
            disabled_lints: Vec::new(),
            debounce_ms: 200,
            inter_file_delay_ms: 10,
        }
    }
}

impl DiagnosticsSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn inter_file_delay(&self) -> Duration {
        Duration::from_millis(self.inter_file_delay_ms)
    }

    /// Whether `code` runs under these settings
    pub fn is_lint_enabled(&self, code: LintCode) -> bool {
        self.lint_enabled && !self.disabled_lints.contains(&code)
    }
}
