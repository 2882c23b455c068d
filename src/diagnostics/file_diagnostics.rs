//! Per-file diagnostics, one list per producer kind.

use super::types::{Diagnostic, DiagnosticKind};

/// The last computed diagnostics of one file, kept separately per kind.
///
/// The published list is always the concatenation of the kind lists in
/// [`DiagnosticKind::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiagnostics {
    by_kind: [Vec<Diagnostic>; 3],
}

impl FileDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: DiagnosticKind) -> &[Diagnostic] {
        &self.by_kind[kind.index()]
    }

    /// Replace the list of `kind` wholesale.
    ///
    /// Returns `true` when the merged list changed.
    pub fn update(&mut self, kind: DiagnosticKind, diagnostics: Vec<Diagnostic>) -> bool {
        let slot = &mut self.by_kind[kind.index()];
        if *slot == diagnostics {
            return false;
        }
        *slot = diagnostics;
        true
    }

    /// All diagnostics of the file, every kind concatenated.
    pub fn merged(&self) -> Vec<Diagnostic> {
        DiagnosticKind::ALL
            .iter()
            .flat_map(|kind| self.by_kind[kind.index()].iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.iter().all(Vec::is_empty)
    }
}
