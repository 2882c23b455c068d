//! External diagnostic producers and the outbound sink.
//!
//! The type checker and the native build are not part of this crate; the
//! coordinator only drives them through these traits.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use super::error::Result;
use super::types::Diagnostic;
use crate::base::FileUri;
use crate::project::TreeContainer;

/// Boxed `Send` future returned by producers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Type-inference diagnostics for a single file.
pub trait TypeInferenceDiagnostics: Send + Sync {
    /// Infer `tree` and report its type errors.
    ///
    /// Implementations should return [`DiagnosticsError::Cancelled`] soon
    /// after `cancel` fires.
    ///
    /// [`DiagnosticsError::Cancelled`]: super::DiagnosticsError::Cancelled
    fn diagnostics(
        &self,
        tree: Arc<TreeContainer>,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<Vec<Diagnostic>>>;
}

/// Diagnostics from the native compiler.
///
/// A build triggered for one file reports for every file it compiled.
pub trait BuildDiagnostics: Send + Sync {
    fn diagnostics(
        &self,
        uri: FileUri,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<FxHashMap<FileUri, Vec<Diagnostic>>>>;
}

/// Receives the full merged list of a file whenever it changes.
///
/// An empty list clears what the editor shows.
pub trait DiagnosticsSink: Send + Sync {
    fn publish(&self, uri: &FileUri, diagnostics: Vec<Diagnostic>);
}

/// A type checker that never reports anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTypeInference;

impl TypeInferenceDiagnostics for NoTypeInference {
    fn diagnostics(
        &self,
        _tree: Arc<TreeContainer>,
        _cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<Vec<Diagnostic>>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

/// A build that never reports anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBuild;

impl BuildDiagnostics for NoBuild {
    fn diagnostics(
        &self,
        _uri: FileUri,
        _cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<FxHashMap<FileUri, Vec<Diagnostic>>>> {
        Box::pin(async { Ok(FxHashMap::default()) })
    }
}
