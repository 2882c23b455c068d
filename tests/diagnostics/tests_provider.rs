//! Provider lifecycle: debounce, merge, staleness, supersession.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::helpers::fakes::*;
use crate::helpers::source_fixtures::*;
use elmls::RunOutcome;

// =============================================================================
// DEBOUNCED RUNS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_open_publishes_after_debounce() {
    let h = Harness::new();
    let main = h.open("Main", UNUSED_IMPORT);

    advance(100).await;
    assert!(h.sink.last_for(&main).is_none(), "published inside the debounce window");

    advance(1_000).await;
    assert_eq!(
        h.sink.last_codes(&main),
        vec!["unused_import", "unused_imported_value"]
    );
    assert_eq!(h.types.calls(), vec![main.clone()]);
    assert!(h.provider.in_flight_files().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_restart_the_debounce() {
    let h = Harness::new();
    let main = h.add("Main", CLEAN_MODULE);

    for _ in 0..5 {
        h.edit(&main, UNUSED_IMPORT);
        advance(150).await;
    }
    assert!(h.types.calls().is_empty());
    assert_eq!(h.provider.change_sequence(), 5);

    advance(1_000).await;
    assert_eq!(h.types.calls(), vec![main.clone()]);
    assert_eq!(h.sink.count_for(&main), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pending_files_run_oldest_first_then_open_files() {
    let h = Harness::new();
    let open = h.open("Open", CLEAN_MODULE);
    advance(1_000).await;

    let b = h.add("B", UNUSED_IMPORT);
    let a = h.add("A", UNUSED_IMPORT);
    h.provider.on_document_change(&b);
    advance(5).await;
    h.provider.on_document_change(&a);
    advance(1_000).await;

    let calls = h.types.calls();
    assert_eq!(&calls[calls.len() - 3..], &[b, a, open]);
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_results_are_not_republished() {
    let h = Harness::new();
    let main = h.open("Main", UNUSED_IMPORT);
    advance(1_000).await;
    assert_eq!(h.sink.count_for(&main), 1);

    h.edit(&main, UNUSED_IMPORT);
    advance(1_000).await;
    assert_eq!(h.types.calls().len(), 2);
    assert_eq!(h.sink.count_for(&main), 1);
}

// =============================================================================
// MERGING
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_kinds_merge_and_recompute_independently() {
    let h = Harness::new();
    let main = h.add("Main", UNUSED_IMPORT);
    h.types.set_result(&main, vec![diagnostic("type_mismatch")]);
    h.workspace.open(&main);
    h.provider.on_document_open(&main);
    advance(1_000).await;

    assert_eq!(
        h.sink.last_codes(&main),
        vec!["type_mismatch", "unused_import", "unused_imported_value"]
    );

    // Lint recomputes to nothing; the type error stays
    h.edit(&main, UNUSED_IMPORT_FIXED);
    advance(1_000).await;
    assert_eq!(h.sink.last_codes(&main), vec!["type_mismatch"]);
    assert_eq!(codes(&h.provider.diagnostics_for(&main)), vec!["type_mismatch"]);
}

#[tokio::test(start_paused = true)]
async fn test_failing_producer_keeps_previous_results() {
    let h = Harness::new();
    let main = h.add("Main", UNUSED_IMPORT);
    h.types.set_result(&main, vec![diagnostic("type_mismatch")]);
    h.workspace.open(&main);
    h.provider.on_document_open(&main);
    advance(1_000).await;

    h.types.fail_for(&main);
    h.edit(&main, UNUSED_IMPORT_FIXED);
    advance(1_000).await;

    // Lint still ran; the type error was not blanked out
    assert_eq!(h.sink.last_codes(&main), vec!["type_mismatch"]);
}

#[tokio::test(start_paused = true)]
async fn test_deleted_file_is_cleared() {
    let h = Harness::new();
    let main = h.open("Main", UNUSED_IMPORT);
    advance(1_000).await;
    assert!(!h.sink.last_codes(&main).is_empty());

    h.workspace.remove(&main);
    h.provider.on_file_deleted(&main);
    assert_eq!(h.sink.last_for(&main), Some(Vec::new()));
    assert!(h.provider.diagnostics_for(&main).is_empty());

    // Nothing left to clear the second time
    let published = h.sink.published().len();
    h.provider.on_file_deleted(&main);
    assert_eq!(h.sink.published().len(), published);
}

#[tokio::test(start_paused = true)]
async fn test_file_deleted_mid_run_stays_cleared() {
    let h = Harness::new();
    h.types.set_delay(Duration::from_millis(100));
    let a = h.add("A", UNUSED_IMPORT);
    h.types.set_result(&a, vec![diagnostic("type_mismatch")]);
    h.provider.on_document_change(&a);

    // A's type inference is in flight until 300ms
    advance(250).await;
    h.workspace.remove(&a);
    h.provider.on_file_deleted(&a);

    advance(2_000).await;
    assert!(h.provider.diagnostics_for(&a).is_empty());
    assert!(h.sink.last_for(&a).is_none());
    assert!(h.provider.in_flight_files().is_empty());
}

// =============================================================================
// STALENESS AND SUPERSESSION
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_edit_during_run_discards_its_results() {
    let h = Harness::new();
    h.types.set_delay(Duration::from_millis(100));
    let a = h.add("A", UNUSED_IMPORT);
    let b = h.add("B", UNUSED_IMPORT);
    h.provider.on_document_change(&a);
    h.provider.on_document_change(&b);

    // Debounce fires at 200ms; A's type inference is in flight until 300ms
    advance(250).await;
    assert_eq!(h.provider.in_flight_files(), vec![a.clone(), b.clone()]);
    h.provider.on_document_change(&b);

    advance(190).await;
    assert!(h.sink.is_empty(), "stale run published: {:?}", h.sink.published());
    assert_eq!(h.provider.in_flight_files(), vec![a.clone(), b.clone()]);

    // The next run picks up both files again
    advance(2_000).await;
    assert!(!h.sink.last_codes(&a).is_empty());
    assert!(!h.sink.last_codes(&b).is_empty());
    assert!(h.provider.in_flight_files().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_runs_first_and_loses_no_files() {
    let h = Harness::new();
    h.types.set_delay(Duration::from_millis(100));
    let files: Vec<_> = ["A", "B", "C"]
        .iter()
        .map(|name| h.add(name, UNUSED_IMPORT))
        .collect();
    for file in &files {
        h.provider.on_document_change(file);
    }

    advance(250).await;
    let before = h.sink.published().len();
    let answer = h.provider.interrupt(|| 42);
    assert_eq!(answer, 42);
    assert_eq!(h.sink.published().len(), before);

    advance(2_000).await;
    for file in &files {
        assert!(!h.sink.last_codes(file).is_empty(), "{file} was dropped");
    }
    assert!(h.provider.in_flight_files().is_empty());
}

#[test]
fn test_interrupt_without_run_just_calls() {
    let h = Harness::new();
    assert_eq!(h.provider.interrupt(|| "done"), "done");
}

// =============================================================================
// ON-DEMAND REQUESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_request_diagnostics_bypasses_debounce() {
    let h = Harness::new();
    let a = h.add("A", UNUSED_IMPORT);
    let b = h.add("B", UNUSED_TOP_LEVEL);

    let outcome = h
        .provider
        .request_diagnostics(
            vec![a.clone(), b.clone()],
            Duration::from_millis(5),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(h.sink.last_codes(&a), vec!["unused_import", "unused_imported_value"]);
    assert_eq!(h.sink.last_codes(&b), vec!["unused_top_level"]);
}

#[tokio::test(start_paused = true)]
async fn test_request_diagnostics_honours_cancellation() {
    let h = Harness::new();
    let a = h.add("A", UNUSED_IMPORT);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = h
        .provider
        .request_diagnostics(vec![a.clone()], Duration::ZERO, cancel)
        .await;
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(h.sink.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_request_skips_unknown_files() {
    let h = Harness::new();
    let a = h.add("A", UNUSED_IMPORT);

    let outcome = h
        .provider
        .request_diagnostics(
            vec![uri("Missing"), a.clone()],
            Duration::ZERO,
            CancellationToken::new(),
        )
        .await;
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(h.types.calls(), vec![a.clone()]);
    assert!(h.sink.last_for(&uri("Missing")).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_on_demand_request_replaces_the_debounced_run() {
    let h = Harness::new();
    h.types.set_delay(Duration::from_millis(100));
    let a = h.add("A", UNUSED_IMPORT);
    let b = h.add("B", UNUSED_TOP_LEVEL);
    h.provider.on_document_change(&a);
    h.provider.on_document_change(&b);

    // The debounced run is waiting on A's type inference
    advance(250).await;
    let outcome = h
        .provider
        .request_diagnostics(
            vec![b.clone(), a.clone()],
            Duration::ZERO,
            CancellationToken::new(),
        )
        .await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(h.types.calls(), vec![a.clone(), b.clone(), a.clone()]);
    assert_eq!(h.sink.count_for(&a), 1);
    assert_eq!(h.sink.count_for(&b), 1);
    assert!(h.provider.in_flight_files().is_empty());

    // The replaced run never resumes
    advance(2_000).await;
    assert_eq!(h.types.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_edit_stops_an_on_demand_request() {
    let h = Harness::new();
    h.types.set_delay(Duration::from_millis(100));
    let a = h.add("A", UNUSED_IMPORT);
    let b = h.add("B", UNUSED_IMPORT);
    let c = h.add("C", CLEAN_MODULE);

    let request = h.provider.request_diagnostics(
        vec![a.clone(), b.clone()],
        Duration::ZERO,
        CancellationToken::new(),
    );
    let edit = async {
        advance(50).await;
        h.edit(&c, UNUSED_TOP_LEVEL);
    };
    let (outcome, ()) = tokio::join!(request, edit);

    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(h.sink.last_for(&a).is_none());
    assert!(h.sink.last_for(&b).is_none());
    assert_eq!(h.types.calls(), vec![a.clone()]);

    // The edit's own run picks the requested files up again
    advance(2_000).await;
    assert!(!h.sink.last_codes(&a).is_empty());
    assert!(!h.sink.last_codes(&b).is_empty());
    assert_eq!(h.sink.last_codes(&c), vec!["unused_top_level"]);
}

// =============================================================================
// TEARDOWN
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_everything() {
    let h = Harness::new();
    h.types.set_delay(Duration::from_millis(100));
    let main = h.open("Main", UNUSED_IMPORT);
    advance(1_000).await;
    assert!(!h.provider.diagnostics_for(&main).is_empty());

    h.edit(&main, UNUSED_TOP_LEVEL);
    h.provider.shutdown();
    let published = h.sink.published().len();

    advance(2_000).await;
    assert_eq!(h.sink.published().len(), published);
    assert!(h.provider.diagnostics_for(&main).is_empty());

    h.provider.on_document_change(&main);
    advance(1_000).await;
    assert_eq!(h.sink.published().len(), published);
}
