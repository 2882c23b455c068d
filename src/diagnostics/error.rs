//! Error types for diagnostics producers and the step scheduler.

use thiserror::Error;

use super::types::DiagnosticKind;
use crate::base::FileUri;

/// Errors that can occur while computing diagnostics.
///
/// None of these reach the editor: the coordinator logs them and keeps the
/// previous results.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// An external producer failed on one file.
    #[error("{kind} diagnostics failed for {uri}: {message}")]
    Producer {
        kind: DiagnosticKind,
        uri: FileUri,
        message: String,
    },

    /// A producer observed its cancellation token.
    #[error("diagnostics request cancelled")]
    Cancelled,

    /// A scheduler step failed.
    #[error("step failed: {0}")]
    Step(String),
}

impl DiagnosticsError {
    /// Create a producer error.
    pub fn producer(kind: DiagnosticKind, uri: &FileUri, message: impl Into<String>) -> Self {
        Self::Producer {
            kind,
            uri: uri.clone(),
            message: message.into(),
        }
    }

    /// Create a step error.
    pub fn step(message: impl Into<String>) -> Self {
        Self::Step(message.into())
    }
}

pub type Result<T, E = DiagnosticsError> = std::result::Result<T, E>;
