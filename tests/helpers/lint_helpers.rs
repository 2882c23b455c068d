//! Lint helpers: run the engine on a source string and look at the output.

use elmls::diagnostics::Diagnostic;
use elmls::project::NoTypeLookup;
use elmls::{FileUri, LineIndex, LintCode, TreeContainer, lint_file};

pub const MAIN_URI: &str = "file:///project/src/Main.elm";

/// Parse `source` as `src/Main.elm`.
pub fn tree_from_elm(source: &str) -> TreeContainer {
    TreeContainer::new(FileUri::new(MAIN_URI), source, true)
}

/// All lint diagnostics of `source`.
pub fn lint_elm(source: &str) -> Vec<Diagnostic> {
    lint_file(&tree_from_elm(source), &NoTypeLookup, &[])
}

/// Codes of all lint diagnostics, in output order.
pub fn codes_of(source: &str) -> Vec<String> {
    lint_elm(source)
        .iter()
        .map(|d| d.code.to_string())
        .collect()
}

/// Diagnostics with `code` only.
pub fn findings(source: &str, code: LintCode) -> Vec<Diagnostic> {
    lint_elm(source)
        .into_iter()
        .filter(|d| &*d.code == code.as_str())
        .collect()
}

/// The source text a diagnostic covers.
pub fn covered_text<'a>(source: &'a str, diagnostic: &Diagnostic) -> &'a str {
    let range = LineIndex::new(source)
        .range(diagnostic.range)
        .expect("diagnostic range inside the source");
    &source[std::ops::Range::<usize>::from(range)]
}

/// Assert `source` produces exactly one `code` finding covering `expected`.
pub fn assert_single_finding(source: &str, code: LintCode, expected: &str) {
    let found = findings(source, code);
    assert_eq!(
        found.len(),
        1,
        "expected one {code} in:\n{source}\ngot: {:?}",
        codes_of(source)
    );
    assert_eq!(covered_text(source, &found[0]), expected);
}
