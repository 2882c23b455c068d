//! Settings toggles and native build results.

use crate::helpers::fakes::*;
use crate::helpers::source_fixtures::*;
use elmls::{DiagnosticsSettings, LintCode};

// =============================================================================
// SETTINGS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_disabling_lint_clears_and_reenabling_restores() {
    let h = Harness::new();
    let main = h.open("Main", UNUSED_IMPORT);
    let other = h.add("Other", UNUSED_TOP_LEVEL);
    h.provider.on_document_change(&other);
    advance(1_000).await;
    assert!(!h.sink.last_codes(&main).is_empty());
    assert!(!h.sink.last_codes(&other).is_empty());

    h.provider.update_settings(DiagnosticsSettings {
        lint_enabled: false,
        ..DiagnosticsSettings::default()
    });
    assert_eq!(h.sink.last_for(&main), Some(Vec::new()));
    assert_eq!(h.sink.last_for(&other), Some(Vec::new()));

    // Relinting happens right away, not after a debounce
    h.provider.update_settings(DiagnosticsSettings::default());
    assert_eq!(
        h.sink.last_codes(&main),
        vec!["unused_import", "unused_imported_value"]
    );
    assert_eq!(h.sink.last_codes(&other), vec!["unused_top_level"]);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_lint_runs_publish_nothing() {
    let h = Harness::with_settings(DiagnosticsSettings {
        lint_enabled: false,
        ..DiagnosticsSettings::default()
    });
    let main = h.open("Main", UNUSED_IMPORT);
    advance(1_000).await;

    assert_eq!(h.types.calls(), vec![main.clone()]);
    assert!(h.sink.last_for(&main).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_changing_disabled_lints_relints() {
    let h = Harness::new();
    let main = h.open("Main", UNUSED_IMPORT);
    advance(1_000).await;

    h.provider.update_settings(DiagnosticsSettings {
        disabled_lints: vec![LintCode::UnusedImport],
        ..DiagnosticsSettings::default()
    });
    assert_eq!(h.sink.last_codes(&main), vec!["unused_imported_value"]);

    // Same settings again: nothing to do
    let published = h.sink.published().len();
    h.provider.update_settings(h.provider.settings());
    assert_eq!(h.sink.published().len(), published);
}

#[tokio::test(start_paused = true)]
async fn test_read_only_files_are_not_relinted() {
    let h = Harness::new();
    let package = uri("Package");
    h.workspace.set_file(package.clone(), UNUSED_IMPORT, false);

    h.provider.update_settings(DiagnosticsSettings {
        disabled_lints: vec![LintCode::UnusedAlias],
        ..DiagnosticsSettings::default()
    });
    assert!(h.sink.last_for(&package).is_none());
}

// =============================================================================
// BUILD
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_build_results_replace_the_previous_build() {
    let h = Harness::new();
    let a = h.add("A", CLEAN_MODULE);
    let b = h.add("B", CLEAN_MODULE);

    h.build.set_results(vec![
        (a.clone(), vec![diagnostic("naming_error")]),
        (b.clone(), vec![diagnostic("type_error")]),
    ]);
    h.provider.on_document_save(&a);
    advance(10).await;
    assert_eq!(h.sink.last_codes(&a), vec!["naming_error"]);
    assert_eq!(h.sink.last_codes(&b), vec!["type_error"]);
    assert_eq!(h.build.calls(), vec![a.clone()]);

    // B compiles now, so its build error goes away
    h.build.set_results(vec![(a.clone(), vec![diagnostic("naming_error")])]);
    h.provider.on_document_save(&a);
    advance(10).await;
    assert_eq!(h.sink.last_for(&b), Some(Vec::new()));
    assert_eq!(h.sink.count_for(&a), 1);
}

#[tokio::test(start_paused = true)]
async fn test_build_diagnostics_come_first_in_the_merge() {
    let h = Harness::new();
    let main = h.add("Main", UNUSED_IMPORT);
    h.types.set_result(&main, vec![diagnostic("type_mismatch")]);
    h.build.set_results(vec![(main.clone(), vec![diagnostic("compile_error")])]);

    h.workspace.open(&main);
    h.provider.on_document_open(&main);
    advance(1_000).await;

    assert_eq!(
        h.sink.last_codes(&main),
        vec![
            "compile_error",
            "type_mismatch",
            "unused_import",
            "unused_imported_value"
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_save_does_not_rerun_lint() {
    let h = Harness::new();
    let main = h.open("Main", UNUSED_IMPORT);
    advance(1_000).await;

    h.provider.on_document_save(&main);
    advance(1_000).await;
    assert_eq!(h.types.calls(), vec![main.clone()]);
    assert_eq!(h.build.calls(), vec![main.clone(), main]);
}
