//! Diagnostic value types and their wire shape.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::base::Span;

/// Identifier every diagnostic of this engine carries as its `source`.
pub const SOURCE: &str = "elmls";

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Information => 3,
            Severity::Hint => 4,
        }
    }
}

/// Extra rendering hints for a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticTag {
    /// Unused or unnecessary code; editors usually fade it out.
    Unnecessary,
    Deprecated,
}

/// Which producer a diagnostic came from.
///
/// Each kind is recomputed independently and replaces only its own list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    #[default]
    Lint,
    TypeInference,
    Build,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 3] = [Self::Build, Self::TypeInference, Self::Lint];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Build => 0,
            Self::TypeInference => 1,
            Self::Lint => 2,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lint => f.write_str("lint"),
            Self::TypeInference => f.write_str("type-inference"),
            Self::Build => f.write_str("build"),
        }
    }
}

/// One reported issue.
///
/// Serialises to `{ code, message, severity, source, range, tags? }`; the
/// producer kind stays on this side of the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code (e.g. `unused_import`).
    pub code: Arc<str>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Severity level.
    pub severity: Severity,
    /// Engine that produced it.
    pub source: Arc<str>,
    /// Zero-based start/end positions.
    pub range: Span,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<DiagnosticTag>,
    #[serde(skip)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(code: impl Into<Arc<str>>, message: impl Into<Arc<str>>, range: Span) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: Severity::Warning,
            source: Arc::from(SOURCE),
            range,
            tags: Vec::new(),
            kind: DiagnosticKind::Lint,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: impl Into<Arc<str>>, message: impl Into<Arc<str>>, range: Span) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(code, message, range)
        }
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: DiagnosticTag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Attribute to a producer kind.
    pub fn with_kind(mut self, kind: DiagnosticKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_unnecessary(&self) -> bool {
        self.tags.contains(&DiagnosticTag::Unnecessary)
    }
}
