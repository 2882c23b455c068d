//! One trigger and one quiet shape per lint check.

use rstest::rstest;

use crate::helpers::lint_helpers::*;
use crate::helpers::source_fixtures::*;
use elmls::project::NoTypeLookup;
use elmls::{LintCode, lint_file};

// =============================================================================
// TRIGGERS
// =============================================================================

#[rstest]
#[case::unused_import(LintCode::UnusedImport, UNUSED_IMPORT, "import Foo exposing (bar)")]
#[case::unused_imported_value(LintCode::UnusedImportedValue, UNUSED_IMPORT, "bar")]
#[case::unused_alias(
    LintCode::UnusedAlias,
    "module Main exposing (main)\n\nimport Html.Attributes as Attr\n\nmain =\n    Html.Attributes.class \"x\"\n",
    "as Attr"
)]
#[case::unused_pattern(
    LintCode::UnusedPattern,
    "module Main exposing (f)\n\nf a =\n    1\n",
    "a"
)]
#[case::unused_top_level(LintCode::UnusedTopLevel, UNUSED_TOP_LEVEL, "helper")]
#[case::map_nothing_to_nothing(
    LintCode::MapNothingToNothing,
    "module Main exposing (f)\n\nf m =\n    case m of\n        Nothing ->\n            Nothing\n\n        Just x ->\n            Just x\n",
    "Nothing ->\n            Nothing"
)]
#[case::boolean_case_expr(
    LintCode::BooleanCaseExpr,
    BOOLEAN_CASE,
    "case b of\n        True ->\n            1\n\n        False ->\n            2"
)]
#[case::drop_concat_of_lists(
    LintCode::DropConcatOfLists,
    "module Main exposing (xs)\n\nxs =\n    [ 1, 2 ] ++ [ 3, 4 ]\n",
    "[ 1, 2 ] ++ [ 3, 4 ]"
)]
#[case::drop_cons_of_item_and_list(
    LintCode::DropConsOfItemAndList,
    "module Main exposing (f)\n\nf x =\n    x :: [ 2 ]\n",
    "x :: [ 2 ]"
)]
#[case::drop_cons_keeps_tighter_operands(
    LintCode::DropConsOfItemAndList,
    "module Main exposing (f)\n\nf a b =\n    a + b :: [ 2 ]\n",
    "a + b :: [ 2 ]"
)]
#[case::drop_cons_stops_at_looser_operators(
    LintCode::DropConsOfItemAndList,
    "module Main exposing (f)\n\nf a b =\n    a == b * 2 :: [ 2 ]\n",
    "b * 2 :: [ 2 ]"
)]
#[case::use_cons_over_concat(
    LintCode::UseConsOverConcat,
    "module Main exposing (f)\n\nf x rest =\n    [ x ] ++ rest\n",
    "[ x ] ++ rest"
)]
#[case::single_field_record(
    LintCode::SingleFieldRecord,
    "module Main exposing (Point)\n\ntype alias Point =\n    { x : Int }\n",
    "{ x : Int }"
)]
#[case::unnecessary_list_concat(
    LintCode::UnnecessaryListConcat,
    "module Main exposing (xs)\n\nxs =\n    List.concat [ [ 1 ], [ 2 ] ]\n",
    "List.concat [ [ 1 ], [ 2 ] ]"
)]
#[case::unnecessary_port_module(
    LintCode::UnnecessaryPortModule,
    PORT_MODULE_WITHOUT_PORTS,
    "port module Main exposing (main)"
)]
#[case::no_uncurried_prefix(
    LintCode::NoUncurriedPrefix,
    "module Main exposing (x)\n\nx =\n    (+) 1 2\n",
    "(+) 1 2"
)]
#[case::unused_type_alias(
    LintCode::UnusedTypeAlias,
    "module Main exposing (main)\n\ntype alias Unused =\n    Int\n\nmain =\n    1\n",
    "Unused"
)]
#[case::unused_value_constructor(
    LintCode::UnusedValueConstructor,
    "module Main exposing (main, Color)\n\ntype Color\n    = Red\n    | Green\n\nmain =\n    Red\n",
    "Green"
)]
fn test_check_fires(#[case] code: LintCode, #[case] source: &str, #[case] expected: &str) {
    assert_single_finding(source, code, expected);
}

// =============================================================================
// QUIET SHAPES
// =============================================================================

#[rstest]
#[case::wildcard_import(
    LintCode::UnusedImport,
    "module Main exposing (main)\n\nimport Foo exposing (..)\n\nmain =\n    1\n"
)]
#[case::qualified_use(
    LintCode::UnusedImport,
    "module Main exposing (main)\n\nimport Foo\n\nmain =\n    Foo.bar\n"
)]
#[case::type_with_constructors(
    LintCode::UnusedImportedValue,
    "module Main exposing (main)\n\nimport Foo exposing (Msg(..))\n\nmain =\n    1\n"
)]
#[case::used_alias(
    LintCode::UnusedAlias,
    "module Main exposing (main)\n\nimport Html.Attributes as Attr\n\nmain =\n    Attr.class \"x\"\n"
)]
#[case::used_parameter(LintCode::UnusedPattern, "module Main exposing (f)\n\nf a =\n    a\n")]
#[case::expose_all(
    LintCode::UnusedTopLevel,
    "module Main exposing (..)\n\nhelper x =\n    x\n"
)]
#[case::used_elsewhere(LintCode::UnusedTopLevel, USED_TOP_LEVEL)]
#[case::case_on_maybe(
    LintCode::BooleanCaseExpr,
    "module Main exposing (f)\n\nf m =\n    case m of\n        Just _ ->\n            1\n\n        Nothing ->\n            2\n"
)]
#[case::concat_two_singletons(
    LintCode::UseConsOverConcat,
    "module Main exposing (xs)\n\nxs =\n    [ 1 ] ++ [ 2 ]\n"
)]
#[case::two_fields(
    LintCode::SingleFieldRecord,
    "module Main exposing (Point)\n\ntype alias Point =\n    { x : Int, y : Int }\n"
)]
#[case::extensible_record(
    LintCode::SingleFieldRecord,
    "module Main exposing (Named)\n\ntype alias Named a =\n    { a | name : String }\n"
)]
#[case::concat_of_variable(
    LintCode::UnnecessaryListConcat,
    "module Main exposing (f)\n\nf ys =\n    List.concat [ [ 1 ], ys ]\n"
)]
#[case::port_module_with_port(LintCode::UnnecessaryPortModule, PORT_MODULE_WITH_PORT)]
#[case::partial_prefix(LintCode::NoUncurriedPrefix, "module Main exposing (inc)\n\ninc =\n    (+) 1\n")]
#[case::alias_in_annotation(
    LintCode::UnusedTypeAlias,
    "module Main exposing (main)\n\ntype alias Count =\n    Int\n\nmain : Count\nmain =\n    1\n"
)]
#[case::constructors_exposed(
    LintCode::UnusedValueConstructor,
    "module Main exposing (main, Color(..))\n\ntype Color\n    = Red\n    | Green\n\nmain =\n    Red\n"
)]
fn test_check_stays_quiet(#[case] code: LintCode, #[case] source: &str) {
    let found = findings(source, code);
    assert!(found.is_empty(), "unexpected {code}: {found:?}");
}

// =============================================================================
// SCOPES AND SETTINGS
// =============================================================================

#[test]
fn test_nested_let_destructuring_keeps_narrow_scope() {
    // Only names at the declaration's own level see the `in` body
    let source = "module Main exposing (f)\n\nf pair =\n    let\n        ( a, ( b, c ) ) =\n            pair\n    in\n    a + b + c\n";
    let unused: Vec<_> = findings(source, LintCode::UnusedPattern)
        .iter()
        .map(|d| covered_text(source, d).to_string())
        .collect();
    assert_eq!(unused, vec!["b", "c"]);
}

#[test]
fn test_let_function_used_in_body() {
    let source = "module Main exposing (f)\n\nf =\n    let\n        double n =\n            n * 2\n    in\n    double 2\n";
    assert!(findings(source, LintCode::UnusedPattern).is_empty());
}

#[test]
fn test_disabled_codes_are_skipped() {
    let tree = tree_from_elm(UNUSED_IMPORT);
    let diagnostics = lint_file(&tree, &NoTypeLookup, &[LintCode::UnusedImport]);
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code.to_string()).collect();
    assert_eq!(codes, vec!["unused_imported_value"]);
}

#[test]
fn test_clean_module_has_no_findings() {
    assert!(lint_elm(CLEAN_MODULE).is_empty());
    assert!(lint_elm(EXPOSE_ALL_MODULE).is_empty());
}
