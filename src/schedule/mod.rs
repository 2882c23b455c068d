//! Cooperative multistep scheduler.
//!
//! A run is a [`Multistep`] driven one step (tick) at a time on a tokio
//! task. After each step the action says how to continue: on the next
//! turn of the runtime ([`Next::immediate`]), after a pause
//! ([`Next::delay`]), or not at all, which completes the run. Between ticks
//! the task yields, so other work (new edits, requests) interleaves.
//!
//! Guarantees:
//! - ticks of one run never overlap, and only one run is active per
//!   scheduler;
//! - the cancellation token is checked before every tick, never mid-tick;
//! - `on_done` is called exactly once per [`MultistepScheduler::start_new`],
//!   whether the run completes, is cancelled, fails, or is superseded.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::diagnostics::DiagnosticsError;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The action stopped scheduling ticks
    Completed,
    /// The token was cancelled before a tick
    Cancelled,
    /// A step returned an error (or panicked)
    Failed,
    /// A newer run replaced this one
    Superseded,
}

/// Continuation requested by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    Immediate,
    Delay(Duration),
}

/// Handle a step uses to schedule the next tick.
#[derive(Debug, Default)]
pub struct Next {
    continuation: Option<Continuation>,
}

impl Next {
    /// Run the next step on the next scheduler turn.
    pub fn immediate(&mut self) {
        self.continuation = Some(Continuation::Immediate);
    }

    /// Run the next step no sooner than `delay` from now.
    pub fn delay(&mut self, delay: Duration) {
        self.continuation = Some(Continuation::Delay(delay));
    }
}

/// A computation that advances one tick per call.
pub trait Multistep: Send + 'static {
    /// Do one tick of work. Leaving `next` untouched completes the run.
    fn step(&mut self, next: &mut Next) -> impl Future<Output = Result<(), DiagnosticsError>> + Send;
}

type OnDone = Box<dyn FnOnce(RunOutcome) + Send>;

/// `on_done` shared between the scheduler and the run's task; whoever takes
/// it first reports the outcome.
#[derive(Clone)]
struct DoneSlot(Arc<Mutex<Option<OnDone>>>);

impl DoneSlot {
    fn new(on_done: OnDone) -> Self {
        Self(Arc::new(Mutex::new(Some(on_done))))
    }

    fn fire(&self, outcome: RunOutcome) {
        // Take under the lock, call outside it
        let on_done = self.0.lock().take();
        if let Some(on_done) = on_done {
            on_done(outcome);
        }
    }
}

/// Fires `Failed` if the task is dropped without reporting, which happens
/// when a step panics.
struct DoneGuard(DoneSlot);

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.0.fire(RunOutcome::Failed);
    }
}

struct ActiveRun {
    id: u64,
    handle: JoinHandle<()>,
    done: DoneSlot,
}

/// Runs at most one [`Multistep`] at a time.
///
/// Must be used from within a tokio runtime.
#[derive(Default)]
pub struct MultistepScheduler {
    current: Mutex<Option<ActiveRun>>,
    next_id: AtomicU64,
}

impl MultistepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `action`, superseding the active run if there is one.
    ///
    /// The first tick runs on a later turn of the runtime, never inside
    /// this call. Returns the id of the new run.
    pub fn start_new<M: Multistep>(
        &self,
        cancel: CancellationToken,
        action: M,
        on_done: impl FnOnce(RunOutcome) + Send + 'static,
    ) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let done = DoneSlot::new(Box::new(on_done));
        let handle = tokio::spawn(drive(action, cancel, DoneGuard(done.clone()), id));

        let previous = self.current.lock().replace(ActiveRun { id, handle, done });
        if let Some(previous) = previous {
            tracing::debug!(previous = previous.id, run = id, "superseding run");
            previous.handle.abort();
            previous.done.fire(RunOutcome::Superseded);
        }
        id
    }

    /// Stop the active run, if any, reporting it as cancelled.
    pub fn stop(&self) {
        let previous = self.current.lock().take();
        if let Some(previous) = previous {
            previous.handle.abort();
            previous.done.fire(RunOutcome::Cancelled);
        }
    }

    /// Whether a run is still ticking
    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }

    /// Id of the most recently started run
    pub fn current_run(&self) -> Option<u64> {
        self.current.lock().as_ref().map(|run| run.id)
    }
}

impl Drop for MultistepScheduler {
    fn drop(&mut self) {
        if let Some(run) = self.current.get_mut().take() {
            run.handle.abort();
        }
    }
}

async fn drive<M: Multistep>(mut action: M, cancel: CancellationToken, guard: DoneGuard, id: u64) {
    // The first tick is never run synchronously by `start_new`
    tokio::task::yield_now().await;

    let outcome = loop {
        if cancel.is_cancelled() {
            tracing::debug!(run = id, "run cancelled");
            break RunOutcome::Cancelled;
        }
        tracing::trace!(run = id, "tick");

        let mut next = Next::default();
        if let Err(err) = action.step(&mut next).await {
            tracing::error!(run = id, error = %err, "scheduled step failed");
            break RunOutcome::Failed;
        }

        match next.continuation {
            None => break RunOutcome::Completed,
            Some(Continuation::Immediate) => tokio::task::yield_now().await,
            Some(Continuation::Delay(delay)) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => {}
                }
            }
        }
    };

    guard.0.fire(outcome);
}
