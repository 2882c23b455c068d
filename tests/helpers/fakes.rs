//! Recording fakes for the diagnostics producers and the sink, plus a
//! harness wiring them to a provider over an in-memory workspace.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tokio_util::sync::CancellationToken;

use elmls::base::Span;
use elmls::diagnostics::{
    BoxFuture, BuildDiagnostics, Diagnostic, DiagnosticKind, DiagnosticsError, DiagnosticsProvider,
    DiagnosticsSettings, DiagnosticsSink, Result, TypeInferenceDiagnostics,
};
use elmls::{FileUri, TreeContainer, Workspace};

pub const SOURCE_DIR: &str = "file:///project/src";

pub fn uri(module: &str) -> FileUri {
    FileUri::new(format!("{SOURCE_DIR}/{module}.elm"))
}

/// A diagnostic that is easy to tell apart by code.
pub fn diagnostic(code: &str) -> Diagnostic {
    Diagnostic::error(code, format!("{code} message"), Span::from_coords(0, 0, 0, 1))
}

pub fn codes(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.code.to_string()).collect()
}

// ============================================================================
// SINK
// ============================================================================

#[derive(Default)]
pub struct RecordingSink {
    published: Mutex<Vec<(FileUri, Vec<Diagnostic>)>>,
}

impl DiagnosticsSink for RecordingSink {
    fn publish(&self, uri: &FileUri, diagnostics: Vec<Diagnostic>) {
        self.published.lock().push((uri.clone(), diagnostics));
    }
}

impl RecordingSink {
    pub fn published(&self) -> Vec<(FileUri, Vec<Diagnostic>)> {
        self.published.lock().clone()
    }

    /// The last list published for `uri`.
    pub fn last_for(&self, uri: &FileUri) -> Option<Vec<Diagnostic>> {
        self.published
            .lock()
            .iter()
            .rev()
            .find(|(published, _)| published == uri)
            .map(|(_, diagnostics)| diagnostics.clone())
    }

    pub fn last_codes(&self, uri: &FileUri) -> Vec<String> {
        self.last_for(uri).map(|d| codes(&d)).unwrap_or_default()
    }

    pub fn count_for(&self, uri: &FileUri) -> usize {
        self.published
            .lock()
            .iter()
            .filter(|(published, _)| published == uri)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.published.lock().is_empty()
    }
}

// ============================================================================
// TYPE INFERENCE
// ============================================================================

/// Answers from a table after a fixed delay; records every request.
#[derive(Default)]
pub struct FakeTypeInference {
    delay: Mutex<Duration>,
    results: Mutex<FxHashMap<FileUri, Vec<Diagnostic>>>,
    failing: Mutex<FxHashSet<FileUri>>,
    calls: Mutex<Vec<FileUri>>,
}

impl FakeTypeInference {
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn set_result(&self, uri: &FileUri, diagnostics: Vec<Diagnostic>) {
        self.results.lock().insert(uri.clone(), diagnostics);
    }

    pub fn fail_for(&self, uri: &FileUri) {
        self.failing.lock().insert(uri.clone());
    }

    pub fn calls(&self) -> Vec<FileUri> {
        self.calls.lock().clone()
    }
}

impl TypeInferenceDiagnostics for FakeTypeInference {
    fn diagnostics(
        &self,
        tree: Arc<TreeContainer>,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<Vec<Diagnostic>>> {
        let uri = tree.uri().clone();
        self.calls.lock().push(uri.clone());
        let delay = *self.delay.lock();
        let result = if self.failing.lock().contains(&uri) {
            Err(DiagnosticsError::producer(
                DiagnosticKind::TypeInference,
                &uri,
                "checker crashed",
            ))
        } else {
            Ok(self.results.lock().get(&uri).cloned().unwrap_or_default())
        };

        Box::pin(async move {
            tokio::select! {
                _ = cancel.cancelled() => Err(DiagnosticsError::Cancelled),
                _ = tokio::time::sleep(delay) => result,
            }
        })
    }
}

// ============================================================================
// BUILD
// ============================================================================

#[derive(Default)]
pub struct FakeBuild {
    results: Mutex<FxHashMap<FileUri, Vec<Diagnostic>>>,
    calls: Mutex<Vec<FileUri>>,
}

impl FakeBuild {
    pub fn set_results(&self, results: Vec<(FileUri, Vec<Diagnostic>)>) {
        *self.results.lock() = results.into_iter().collect();
    }

    pub fn calls(&self) -> Vec<FileUri> {
        self.calls.lock().clone()
    }
}

impl BuildDiagnostics for FakeBuild {
    fn diagnostics(
        &self,
        uri: FileUri,
        _cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<FxHashMap<FileUri, Vec<Diagnostic>>>> {
        self.calls.lock().push(uri);
        let results = self.results.lock().clone();
        Box::pin(async move { Ok(results) })
    }
}

// ============================================================================
// HARNESS
// ============================================================================

pub struct Harness {
    pub workspace: Arc<Workspace>,
    pub sink: Arc<RecordingSink>,
    pub types: Arc<FakeTypeInference>,
    pub build: Arc<FakeBuild>,
    pub provider: DiagnosticsProvider,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(DiagnosticsSettings::default())
    }

    pub fn with_settings(settings: DiagnosticsSettings) -> Self {
        let workspace = Arc::new(Workspace::new(vec![FileUri::new(SOURCE_DIR)]));
        let sink = Arc::new(RecordingSink::default());
        let types = Arc::new(FakeTypeInference::default());
        let build = Arc::new(FakeBuild::default());
        let provider = DiagnosticsProvider::new(
            workspace.clone(),
            types.clone(),
            build.clone(),
            sink.clone(),
            settings,
        );
        Self {
            workspace,
            sink,
            types,
            build,
            provider,
        }
    }

    /// Add a writable module to the project.
    pub fn add(&self, module: &str, source: &str) -> FileUri {
        let uri = uri(module);
        self.workspace.set_file(uri.clone(), source, true);
        uri
    }

    /// Add a module and open it in the editor.
    pub fn open(&self, module: &str, source: &str) -> FileUri {
        let uri = self.add(module, source);
        self.workspace.open(&uri);
        self.provider.on_document_open(&uri);
        uri
    }

    /// Replace a module's text as the editor would on a keystroke.
    pub fn edit(&self, uri: &FileUri, source: &str) {
        self.workspace.set_file(uri.clone(), source, true);
        self.provider.on_document_change(uri);
    }
}

/// Let the paused clock run for `ms` milliseconds.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
