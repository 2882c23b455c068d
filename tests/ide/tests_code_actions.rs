//! Quick fixes, applied back to the source.

use rstest::rstest;

use crate::helpers::lint_helpers::*;
use elmls::LineIndex;
use elmls::LintCode;
use elmls::ide::{CodeAction, quick_fix, quick_fixes};

/// Apply an action's edits to `source`.
fn apply(source: &str, action: &CodeAction) -> String {
    let index = LineIndex::new(source);
    let mut edits: Vec<_> = action
        .edits
        .iter()
        .map(|edit| (index.range(edit.range).expect("edit in range"), edit.new_text.as_str()))
        .collect();
    edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start()));

    let mut text = source.to_string();
    for (range, new_text) in edits {
        text.replace_range(std::ops::Range::<usize>::from(range), new_text);
    }
    text
}

fn fixed(source: &str, code: LintCode) -> String {
    let tree = tree_from_elm(source);
    let diagnostic = findings(source, code)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no {code} in:\n{source}"));
    let action = quick_fix(&tree, &diagnostic).expect("a quick fix");
    assert_eq!(action.diagnostic, diagnostic);
    apply(source, &action)
}

#[rstest]
#[case::first_of_two(
    LintCode::UnusedImportedValue,
    "module Main exposing (main)\n\nimport Html exposing (div, text)\n\nmain =\n    text \"\"\n",
    "module Main exposing (main)\n\nimport Html exposing (text)\n\nmain =\n    text \"\"\n"
)]
#[case::last_of_two(
    LintCode::UnusedImportedValue,
    "module Main exposing (main)\n\nimport Html exposing (div, text)\n\nmain =\n    div\n",
    "module Main exposing (main)\n\nimport Html exposing (div)\n\nmain =\n    div\n"
)]
#[case::only_item(
    LintCode::UnusedImportedValue,
    "module Main exposing (main)\n\nimport Html exposing (div)\n\nmain =\n    Html.text \"\"\n",
    "module Main exposing (main)\n\nimport Html\n\nmain =\n    Html.text \"\"\n"
)]
#[case::alias(
    LintCode::UnusedAlias,
    "module Main exposing (main)\n\nimport Html.Events as Events exposing (onClick)\n\nmain =\n    onClick\n",
    "module Main exposing (main)\n\nimport Html.Events exposing (onClick)\n\nmain =\n    onClick\n"
)]
#[case::lambda_argument(
    LintCode::UnusedPattern,
    "module Main exposing (f)\n\nf =\n    \\x y -> y\n",
    "module Main exposing (f)\n\nf =\n    \\_ y -> y\n"
)]
#[case::case_branch(
    LintCode::UnusedPattern,
    "module Main exposing (f)\n\nf m =\n    case m of\n        Just v ->\n            1\n\n        Nothing ->\n            0\n",
    "module Main exposing (f)\n\nf m =\n    case m of\n        Just _ ->\n            1\n\n        Nothing ->\n            0\n"
)]
#[case::record_field(
    LintCode::UnusedPattern,
    "module Main exposing (f)\n\nf { a, b, c } =\n    a + c\n",
    "module Main exposing (f)\n\nf { a, c } =\n    a + c\n"
)]
#[case::last_record_field(
    LintCode::UnusedPattern,
    "module Main exposing (f)\n\nf { a, b } =\n    a\n",
    "module Main exposing (f)\n\nf { a } =\n    a\n"
)]
#[case::only_record_field(
    LintCode::UnusedPattern,
    "module Main exposing (f)\n\nf { a } =\n    0\n",
    "module Main exposing (f)\n\nf _ =\n    0\n"
)]
#[case::as_name(
    LintCode::UnusedPattern,
    "module Main exposing (f)\n\nf (( a, b ) as pair) =\n    a + b\n",
    "module Main exposing (f)\n\nf (( a, b )) =\n    a + b\n"
)]
fn test_quick_fix(#[case] code: LintCode, #[case] source: &str, #[case] expected: &str) {
    assert_eq!(fixed(source, code), expected);
}

#[test]
fn test_quick_fixes_cover_only_fixable_codes() {
    let source = "module Main exposing (main)\n\nimport Html exposing (div)\nimport Json.Decode as D\n\nmain =\n    Html.text \"\"\n\nhelper x =\n    1\n";
    let tree = tree_from_elm(source);
    let diagnostics = lint_elm(source);
    let fixable: Vec<_> = quick_fixes(&tree, &diagnostics)
        .into_iter()
        .map(|action| action.diagnostic.code.to_string())
        .collect();
    assert_eq!(fixable, vec!["unused_imported_value", "unused_alias", "unused_pattern"]);
}

#[test]
fn test_stale_diagnostic_has_no_fix() {
    let source = "module Main exposing (f)\n\nf a =\n    1\n";
    let diagnostic = findings(source, LintCode::UnusedPattern).remove(0);

    // The text moved on; the range no longer covers a binding
    let edited = tree_from_elm("module Main exposing (f)\n\nf =\n    1\n");
    assert!(quick_fix(&edited, &diagnostic).is_none());
}
