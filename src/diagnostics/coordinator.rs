//! The diagnostics coordinator.
//!
//! Edits mark files pending and bump the change sequence. After a quiet
//! period the pending files (oldest edit first), the unfinished files of an
//! interrupted run, and every open file are analysed one after another on a
//! [`MultistepScheduler`]: type inference first, then lint, publishing each
//! kind as soon as it is known. A run that sees the change sequence move
//! stops publishing at once; the edit that moved it has already queued the
//! next run.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{DiagnosticsError, Result};
use super::file_diagnostics::FileDiagnostics;
use super::producers::{BuildDiagnostics, DiagnosticsSink, TypeInferenceDiagnostics};
use super::settings::DiagnosticsSettings;
use super::types::{Diagnostic, DiagnosticKind};
use crate::base::FileUri;
use crate::lint::lint_file;
use crate::project::{ProjectTypeLookup, SourceFiles, TreeContainer};
use crate::schedule::{Multistep, MultistepScheduler, Next, RunOutcome};

/// The run currently working through the drained files.
#[derive(Debug)]
struct InFlight {
    id: u64,
    cancel: CancellationToken,
    files: Vec<FileUri>,
    /// Number of files fully processed (both phases)
    progress: Arc<AtomicUsize>,
}

impl InFlight {
    fn unfinished(&self) -> impl Iterator<Item = FileUri> + '_ {
        let done = self.progress.load(Ordering::SeqCst).min(self.files.len());
        self.files[done..].iter().cloned()
    }
}

#[derive(Default)]
struct ProviderState {
    settings: DiagnosticsSettings,
    /// File -> time it was last marked pending
    pending: IndexMap<FileUri, Instant>,
    in_flight: Option<InFlight>,
    diagnostics: FxHashMap<FileUri, FileDiagnostics>,
    debounce: Option<JoinHandle<()>>,
    build_cancel: Option<CancellationToken>,
    next_request: u64,
}

impl ProviderState {
    /// Replace one kind of `uri`'s diagnostics; returns the merged list if
    /// it changed.
    fn update(
        &mut self,
        uri: &FileUri,
        kind: DiagnosticKind,
        diagnostics: Vec<Diagnostic>,
    ) -> Option<Vec<Diagnostic>> {
        if diagnostics.is_empty() && !self.diagnostics.contains_key(uri) {
            return None;
        }
        let entry = self.diagnostics.entry(uri.clone()).or_default();
        if !entry.update(kind, diagnostics) {
            return None;
        }
        let merged = entry.merged();
        if entry.is_empty() {
            self.diagnostics.remove(uri);
        }
        Some(merged)
    }
}

struct Shared {
    files: Arc<dyn SourceFiles>,
    type_inference: Arc<dyn TypeInferenceDiagnostics>,
    build: Arc<dyn BuildDiagnostics>,
    sink: Arc<dyn DiagnosticsSink>,
    scheduler: MultistepScheduler,
    change_sequence: AtomicU64,
    /// Parent of every token the provider hands out
    shutdown: CancellationToken,
    /// Serialises drains so `in_flight` always names the scheduler's run
    starting: Mutex<()>,
    state: Mutex<ProviderState>,
}

impl Shared {
    /// Store `diagnostics` as the `kind` list of `uri` and publish the
    /// merged list if it changed.
    fn publish(&self, uri: &FileUri, kind: DiagnosticKind, diagnostics: Vec<Diagnostic>) {
        let diagnostics = diagnostics
            .into_iter()
            .map(|d| d.with_kind(kind))
            .collect();
        let merged = {
            let mut state = self.state.lock();
            // Deleted while its producers ran
            if self.files.tree(uri).is_none() {
                tracing::trace!(uri = %uri, %kind, "file is gone, dropping diagnostics");
                return;
            }
            state.update(uri, kind, diagnostics)
        };
        if let Some(merged) = merged {
            tracing::trace!(uri = %uri, %kind, count = merged.len(), "publishing diagnostics");
            self.sink.publish(uri, merged);
        }
    }

    fn lint(&self, tree: &TreeContainer) -> Vec<Diagnostic> {
        let settings = self.state.lock().settings.clone();
        if !settings.lint_enabled {
            return Vec::new();
        }
        let lookup = ProjectTypeLookup::new(self.files.as_ref());
        lint_file(tree, &lookup, &settings.disabled_lints)
    }

    fn mark_pending(self: &Arc<Self>, uri: FileUri) {
        let mut state = self.state.lock();
        tracing::trace!(uri = %uri, "marking file pending");
        state.pending.insert(uri, Instant::now());

        if let Some(previous) = state.debounce.take() {
            previous.abort();
        }
        let delay = state.settings.debounce();
        let weak = Arc::downgrade(self);
        state.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.drain();
            }
        }));
    }

    /// Start a run over the pending files (oldest first), the unfinished
    /// files of the current run, and the open files.
    fn drain(self: &Arc<Self>) {
        let _starting = self.starting.lock();
        let files: IndexSet<FileUri> = {
            let mut state = self.state.lock();
            if let Some(debounce) = state.debounce.take() {
                debounce.abort();
            }
            let mut pending: Vec<(FileUri, Instant)> = state.pending.drain(..).collect();
            pending.sort_by_key(|(_, marked)| *marked);
            pending.into_iter().map(|(uri, _)| uri).collect()
        };
        let cancel = self.shutdown.child_token();
        self.start_run(files, true, cancel, None, |_| {});
    }

    /// Supersede the in-flight run with one over `files`, followed by the
    /// files the superseded run had not finished.
    ///
    /// Returns `false`, without calling `on_done`, when there is nothing to
    /// analyse. The caller holds `starting`.
    fn start_run(
        self: &Arc<Self>,
        mut files: IndexSet<FileUri>,
        with_open_files: bool,
        cancel: CancellationToken,
        inter_file_delay: Option<Duration>,
        on_done: impl FnOnce(RunOutcome) + Send + 'static,
    ) -> bool {
        let (id, run) = {
            let mut state = self.state.lock();
            if let Some(previous) = state.in_flight.take() {
                tracing::debug!(request = previous.id, "cancelling in-flight diagnostics");
                previous.cancel.cancel();
                files.extend(previous.unfinished());
            }
            if with_open_files {
                files.extend(self.files.open_files());
            }
            if files.is_empty() {
                return false;
            }

            state.next_request += 1;
            let id = state.next_request;
            let files: Vec<FileUri> = files.into_iter().collect();
            let progress = Arc::new(AtomicUsize::new(0));
            tracing::debug!(request = id, files = files.len(), "starting diagnostics run");

            state.in_flight = Some(InFlight {
                id,
                cancel: cancel.clone(),
                files: files.clone(),
                progress: progress.clone(),
            });
            let run = DiagnosticsRun {
                shared: self.clone(),
                files,
                index: 0,
                phase: Phase::TypeInference,
                sequence: self.change_sequence.load(Ordering::SeqCst),
                cancel: cancel.clone(),
                progress,
                inter_file_delay: inter_file_delay
                    .unwrap_or_else(|| state.settings.inter_file_delay()),
            };
            (id, run)
        };

        let weak = Arc::downgrade(self);
        self.scheduler.start_new(cancel, run, move |outcome| {
            if let Some(shared) = weak.upgrade() {
                shared.finish_request(id, outcome);
            }
            on_done(outcome);
        });
        true
    }

    fn finish_request(&self, id: u64, outcome: RunOutcome) {
        tracing::debug!(request = id, ?outcome, "diagnostics request finished");
        if outcome != RunOutcome::Completed {
            return;
        }
        let mut state = self.state.lock();
        if state.in_flight.as_ref().is_some_and(|run| run.id == id) {
            state.in_flight = None;
        }
    }

    fn refresh_build(self: &Arc<Self>, uri: FileUri) {
        let cancel = self.shutdown.child_token();
        if let Some(previous) = self.state.lock().build_cancel.replace(cancel.clone()) {
            previous.cancel();
        }
        let request = self.build.diagnostics(uri.clone(), cancel.clone());
        let weak = Arc::downgrade(self);

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                result = request => result,
            };
            let Some(shared) = weak.upgrade() else {
                return;
            };
            match result {
                Ok(_) if cancel.is_cancelled() => {}
                Ok(by_file) => shared.apply_build(by_file),
                Err(DiagnosticsError::Cancelled) => {
                    tracing::debug!(uri = %uri, "build cancelled");
                }
                Err(err) => {
                    tracing::warn!(
                        uri = %uri,
                        kind = %DiagnosticKind::Build,
                        error = %err,
                        "diagnostics producer failed"
                    );
                }
            }
        });
    }

    /// Replace the build diagnostics of every file. Files that had build
    /// diagnostics and are missing from `by_file` are cleared.
    fn apply_build(&self, mut by_file: FxHashMap<FileUri, Vec<Diagnostic>>) {
        let mut changed = {
            let mut state = self.state.lock();
            let cleared: Vec<FileUri> = state
                .diagnostics
                .iter()
                .filter(|(uri, d)| {
                    !d.get(DiagnosticKind::Build).is_empty() && !by_file.contains_key(*uri)
                })
                .map(|(uri, _)| uri.clone())
                .collect();
            for uri in cleared {
                by_file.insert(uri, Vec::new());
            }

            let mut changed = Vec::new();
            for (uri, diagnostics) in by_file {
                let diagnostics = diagnostics
                    .into_iter()
                    .map(|d| d.with_kind(DiagnosticKind::Build))
                    .collect();
                if let Some(merged) = state.update(&uri, DiagnosticKind::Build, diagnostics) {
                    changed.push((uri, merged));
                }
            }
            changed
        };
        changed.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (uri, merged) in changed {
            self.sink.publish(&uri, merged);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    TypeInference,
    Lint,
}

/// A resumable walk over a list of files: one phase of one file per tick.
struct DiagnosticsRun {
    shared: Arc<Shared>,
    files: Vec<FileUri>,
    index: usize,
    phase: Phase,
    /// Change sequence captured when the run started
    sequence: u64,
    cancel: CancellationToken,
    progress: Arc<AtomicUsize>,
    inter_file_delay: Duration,
}

impl DiagnosticsRun {
    fn is_stale(&self) -> bool {
        self.shared.change_sequence.load(Ordering::SeqCst) != self.sequence
    }

    /// Stop without publishing; the remaining files stay unfinished.
    fn abandon(&self, next: &mut Next) {
        tracing::debug!(sequence = self.sequence, "change sequence advanced, abandoning run");
        self.cancel.cancel();
        next.immediate();
    }

    fn finish_file(&mut self) {
        self.index += 1;
        self.phase = Phase::TypeInference;
        self.progress.fetch_add(1, Ordering::SeqCst);
    }
}

impl Multistep for DiagnosticsRun {
    async fn step(&mut self, next: &mut Next) -> Result<()> {
        let Some(uri) = self.files.get(self.index).cloned() else {
            return Ok(());
        };
        let Some(tree) = self.shared.files.tree(&uri) else {
            tracing::trace!(uri = %uri, "file is gone, skipping");
            self.finish_file();
            if self.index < self.files.len() {
                next.immediate();
            }
            return Ok(());
        };

        match self.phase {
            Phase::TypeInference => {
                let request = self
                    .shared
                    .type_inference
                    .diagnostics(tree, self.cancel.clone());
                let result = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        next.immediate();
                        return Ok(());
                    }
                    result = request => result,
                };
                if self.is_stale() {
                    self.abandon(next);
                    return Ok(());
                }

                match result {
                    Ok(diagnostics) => {
                        self.shared
                            .publish(&uri, DiagnosticKind::TypeInference, diagnostics);
                    }
                    Err(DiagnosticsError::Cancelled) if self.cancel.is_cancelled() => {
                        next.immediate();
                        return Ok(());
                    }
                    // Previous type diagnostics of the file stay as they are
                    Err(err) => {
                        tracing::warn!(
                            uri = %uri,
                            kind = %DiagnosticKind::TypeInference,
                            error = %err,
                            "diagnostics producer failed"
                        );
                    }
                }

                if self.is_stale() {
                    self.abandon(next);
                    return Ok(());
                }
                self.phase = Phase::Lint;
                next.immediate();
            }
            Phase::Lint => {
                if self.is_stale() {
                    self.abandon(next);
                    return Ok(());
                }
                let diagnostics = self.shared.lint(&tree);
                self.shared.publish(&uri, DiagnosticKind::Lint, diagnostics);

                self.finish_file();
                if self.index < self.files.len() {
                    next.delay(self.inter_file_delay);
                }
            }
        }
        Ok(())
    }
}

/// Owns the per-file diagnostics of a workspace session and keeps them in
/// step with the editor's edits.
///
/// Must be used from within a tokio runtime.
pub struct DiagnosticsProvider {
    shared: Arc<Shared>,
}

impl DiagnosticsProvider {
    pub fn new(
        files: Arc<dyn SourceFiles>,
        type_inference: Arc<dyn TypeInferenceDiagnostics>,
        build: Arc<dyn BuildDiagnostics>,
        sink: Arc<dyn DiagnosticsSink>,
        settings: DiagnosticsSettings,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                files,
                type_inference,
                build,
                sink,
                scheduler: MultistepScheduler::new(),
                change_sequence: AtomicU64::new(0),
                shutdown: CancellationToken::new(),
                starting: Mutex::new(()),
                state: Mutex::new(ProviderState {
                    settings,
                    ..ProviderState::default()
                }),
            }),
        }
    }

    fn is_shut_down(&self) -> bool {
        self.shared.shutdown.is_cancelled()
    }

    pub fn on_document_open(&self, uri: &FileUri) {
        if self.is_shut_down() {
            return;
        }
        self.shared.refresh_build(uri.clone());
        self.shared.mark_pending(uri.clone());
    }

    pub fn on_document_save(&self, uri: &FileUri) {
        if self.is_shut_down() {
            return;
        }
        self.shared.refresh_build(uri.clone());
    }

    pub fn on_document_change(&self, uri: &FileUri) {
        if self.is_shut_down() {
            return;
        }
        self.shared.change_sequence.fetch_add(1, Ordering::SeqCst);
        self.shared.mark_pending(uri.clone());
    }

    /// Drop every diagnostic of a deleted file, clearing it in the editor.
    pub fn on_file_deleted(&self, uri: &FileUri) {
        let had_diagnostics = {
            let mut state = self.shared.state.lock();
            state.pending.shift_remove(uri);
            state
                .diagnostics
                .remove(uri)
                .is_some_and(|d| !d.is_empty())
        };
        if had_diagnostics {
            tracing::debug!(uri = %uri, "file deleted, clearing diagnostics");
            self.shared.sink.publish(uri, Vec::new());
        }
    }

    /// Apply new settings.
    ///
    /// Turning lint off clears every lint diagnostic. Turning it on, or
    /// changing the disabled lints, relints every writable file right away.
    pub fn update_settings(&self, settings: DiagnosticsSettings) {
        let previous = std::mem::replace(&mut self.shared.state.lock().settings, settings.clone());

        if previous.lint_enabled && !settings.lint_enabled {
            tracing::debug!("lint disabled, clearing lint diagnostics");
            let mut changed = {
                let mut state = self.shared.state.lock();
                let linted: Vec<FileUri> = state
                    .diagnostics
                    .iter()
                    .filter(|(_, d)| !d.get(DiagnosticKind::Lint).is_empty())
                    .map(|(uri, _)| uri.clone())
                    .collect();
                linted
                    .into_iter()
                    .filter_map(|uri| {
                        let merged = state.update(&uri, DiagnosticKind::Lint, Vec::new())?;
                        Some((uri, merged))
                    })
                    .collect::<Vec<_>>()
            };
            changed.sort_by(|(a, _), (b, _)| a.cmp(b));
            for (uri, merged) in changed {
                self.shared.sink.publish(&uri, merged);
            }
        } else if settings.lint_enabled
            && (!previous.lint_enabled || previous.disabled_lints != settings.disabled_lints)
        {
            tracing::debug!("lint settings changed, relinting writable files");
            for uri in self.shared.files.writable_files() {
                let Some(tree) = self.shared.files.tree(&uri) else {
                    continue;
                };
                let diagnostics = self.shared.lint(&tree);
                self.shared.publish(&uri, DiagnosticKind::Lint, diagnostics);
            }
        }
    }

    /// Analyse `files` now, bypassing the debounce queue.
    ///
    /// For hosts that debounce on their own. `delay` is the pause between
    /// files. The request becomes the in-flight run: it supersedes the
    /// current run and takes over that run's unfinished files. A later run
    /// supersedes it in turn, and a change to any document stops it from
    /// publishing further.
    pub async fn request_diagnostics(
        &self,
        files: Vec<FileUri>,
        delay: Duration,
        cancel: CancellationToken,
    ) -> RunOutcome {
        if self.is_shut_down() || files.is_empty() {
            return RunOutcome::Completed;
        }

        let (tx, rx) = oneshot::channel();
        let started = {
            let _starting = self.shared.starting.lock();
            self.shared.start_run(
                files.into_iter().collect(),
                false,
                cancel.child_token(),
                Some(delay),
                move |outcome| {
                    let _ = tx.send(outcome);
                },
            )
        };
        if !started {
            return RunOutcome::Completed;
        }
        rx.await.unwrap_or(RunOutcome::Cancelled)
    }

    /// Run `f` ahead of any diagnostics work.
    ///
    /// An in-flight run is cancelled first and restarted afterwards with its
    /// unfinished files, so nothing is lost.
    pub fn interrupt<R>(&self, f: impl FnOnce() -> R) -> R {
        let in_flight = self
            .shared
            .state
            .lock()
            .in_flight
            .as_ref()
            .map(|run| run.cancel.clone());

        match in_flight {
            Some(cancel) if !self.is_shut_down() => {
                tracing::debug!("interrupting diagnostics");
                cancel.cancel();
                let result = f();
                self.shared.drain();
                result
            }
            _ => f(),
        }
    }

    /// The merged diagnostics currently published for `uri`.
    pub fn diagnostics_for(&self, uri: &FileUri) -> Vec<Diagnostic> {
        self.shared
            .state
            .lock()
            .diagnostics
            .get(uri)
            .map(FileDiagnostics::merged)
            .unwrap_or_default()
    }

    pub fn change_sequence(&self) -> u64 {
        self.shared.change_sequence.load(Ordering::SeqCst)
    }

    /// Files the current run has not finished yet.
    pub fn in_flight_files(&self) -> Vec<FileUri> {
        self.shared
            .state
            .lock()
            .in_flight
            .as_ref()
            .map(|run| run.unfinished().collect())
            .unwrap_or_default()
    }

    pub fn settings(&self) -> DiagnosticsSettings {
        self.shared.state.lock().settings.clone()
    }

    /// Tear the session down: cancel all work, drop all state.
    pub fn shutdown(&self) {
        if self.is_shut_down() {
            return;
        }
        tracing::debug!("shutting down diagnostics");
        self.shared.shutdown.cancel();
        let debounce = {
            let mut state = self.shared.state.lock();
            state.pending.clear();
            state.in_flight = None;
            state.diagnostics.clear();
            state.build_cancel = None;
            state.debounce.take()
        };
        if let Some(debounce) = debounce {
            debounce.abort();
        }
        self.shared.scheduler.stop();
    }
}

impl Drop for DiagnosticsProvider {
    fn drop(&mut self) {
        self.shutdown();
    }
}
