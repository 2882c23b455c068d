//! Quick fixes for unused-code diagnostics.

use rowan::{NodeOrToken, TextRange};
use serde::Serialize;

use crate::base::{FileUri, Span};
use crate::diagnostics::Diagnostic;
use crate::lint::LintCode;
use crate::parser::ast::significant_range;
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode};
use crate::project::TreeContainer;

/// Replace `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Span,
    pub new_text: String,
}

/// A quick fix for one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    pub title: String,
    pub uri: FileUri,
    pub edits: Vec<TextEdit>,
    /// The diagnostic this action fixes
    pub diagnostic: Diagnostic,
}

/// The quick fix for `diagnostic`, if its code has one and it still
/// matches the tree.
pub fn quick_fix(tree: &TreeContainer, diagnostic: &Diagnostic) -> Option<CodeAction> {
    let code = LintCode::from_code(&diagnostic.code)?;
    let range = tree.line_index().range(diagnostic.range)?;
    let root = tree.root();

    let (title, edits) = match code {
        LintCode::UnusedImportedValue => ("Remove unused exposed value", remove_exposed(&root, range)?),
        LintCode::UnusedAlias => ("Remove unused alias", remove_alias(&root, range)?),
        LintCode::UnusedPattern => ("Remove unused variable", remove_binding(&root, range)?),
        _ => return None,
    };

    let edits = edits
        .into_iter()
        .map(|(range, new_text)| TextEdit {
            range: tree.line_index().span(range),
            new_text,
        })
        .collect();
    Some(CodeAction {
        title: title.to_string(),
        uri: tree.uri().clone(),
        edits,
        diagnostic: diagnostic.clone(),
    })
}

/// Quick fixes for every fixable diagnostic in `diagnostics`.
pub fn quick_fixes(tree: &TreeContainer, diagnostics: &[Diagnostic]) -> Vec<CodeAction> {
    diagnostics
        .iter()
        .filter_map(|diagnostic| quick_fix(tree, diagnostic))
        .collect()
}

type Edits = Vec<(TextRange, String)>;

/// The innermost node of one of `kinds` whose significant range is `range`.
fn node_at(root: &SyntaxNode, range: TextRange, kinds: &[SyntaxKind]) -> Option<SyntaxNode> {
    if !root.text_range().contains_range(range) {
        return None;
    }
    let start = match root.covering_element(range) {
        NodeOrToken::Node(node) => node,
        NodeOrToken::Token(token) => token.parent()?,
    };
    start
        .ancestors()
        .find(|n| kinds.contains(&n.kind()) && significant_range(n) == range)
}

fn next_significant(element: &SyntaxElement) -> Option<SyntaxElement> {
    std::iter::successors(element.next_sibling_or_token(), |e| e.next_sibling_or_token())
        .find(|e| !e.kind().is_trivia())
}

fn prev_significant(element: &SyntaxElement) -> Option<SyntaxElement> {
    std::iter::successors(element.prev_sibling_or_token(), |e| e.prev_sibling_or_token())
        .find(|e| !e.kind().is_trivia())
}

/// Start of the whitespace run directly before `element`.
fn leading_whitespace_start(element: &SyntaxElement) -> rowan::TextSize {
    std::iter::successors(element.prev_sibling_or_token(), |e| e.prev_sibling_or_token())
        .take_while(|e| e.kind() == SyntaxKind::WHITESPACE)
        .last()
        .map_or(element.text_range().start(), |e| e.text_range().start())
}

/// Range removing `item` from a comma separated list, with one comma.
fn list_item_removal(item: &SyntaxNode) -> TextRange {
    let element: SyntaxElement = item.clone().into();
    let own = significant_range(item);

    if let Some(comma) = next_significant(&element).filter(|e| e.kind() == SyntaxKind::COMMA) {
        // `a, b` -> `b`
        let end = next_significant(&comma).map_or(comma.text_range().end(), |e| e.text_range().start());
        return TextRange::new(own.start(), end);
    }
    if let Some(comma) = prev_significant(&element).filter(|e| e.kind() == SyntaxKind::COMMA) {
        // `a, b` -> `a`
        return TextRange::new(comma.text_range().start(), own.end());
    }
    own
}

fn remove_exposed(root: &SyntaxNode, range: TextRange) -> Option<Edits> {
    let item = node_at(
        root,
        range,
        &[
            SyntaxKind::EXPOSED_VALUE,
            SyntaxKind::EXPOSED_TYPE,
            SyntaxKind::EXPOSED_OPERATOR,
        ],
    )?;
    let list = item.parent().filter(|p| p.kind() == SyntaxKind::EXPOSING_LIST)?;
    let import = list.parent().filter(|p| p.kind() == SyntaxKind::IMPORT_CLAUSE)?;

    let item_count = list
        .children()
        .filter(|c| {
            matches!(
                c.kind(),
                SyntaxKind::EXPOSED_VALUE | SyntaxKind::EXPOSED_TYPE | SyntaxKind::EXPOSED_OPERATOR
            )
        })
        .count();
    if item_count > 1 {
        return Some(vec![(list_item_removal(&item), String::new())]);
    }

    // The only exposed name: drop ` exposing (…)` altogether
    let keyword = import
        .children_with_tokens()
        .find(|e| e.kind() == SyntaxKind::EXPOSING_KW)?;
    let start = leading_whitespace_start(&keyword);
    Some(vec![(TextRange::new(start, list.text_range().end()), String::new())])
}

fn remove_alias(root: &SyntaxNode, range: TextRange) -> Option<Edits> {
    let clause = node_at(root, range, &[SyntaxKind::AS_CLAUSE])?;
    let element: SyntaxElement = clause.clone().into();
    let start = leading_whitespace_start(&element);
    Some(vec![(TextRange::new(start, clause.text_range().end()), String::new())])
}

fn remove_binding(root: &SyntaxNode, range: TextRange) -> Option<Edits> {
    let token = root
        .token_at_offset(range.start())
        .find(|t| t.kind() == SyntaxKind::LOWER_IDENT && t.text_range() == range)?;
    let pattern = token.parent().filter(|p| p.kind() == SyntaxKind::LOWER_PATTERN)?;
    let Some(parent) = pattern.parent() else {
        return Some(vec![(range, "_".to_string())]);
    };

    match parent.kind() {
        SyntaxKind::RECORD_PATTERN => {
            let fields = parent
                .children()
                .filter(|c| c.kind() == SyntaxKind::LOWER_PATTERN)
                .count();
            if fields == 1 {
                Some(vec![(significant_range(&parent), "_".to_string())])
            } else {
                Some(vec![(list_item_removal(&pattern), String::new())])
            }
        }
        // `(a, b) as pair` -> `(a, b)`
        SyntaxKind::AS_PATTERN => {
            let keyword = parent
                .children_with_tokens()
                .find(|e| e.kind() == SyntaxKind::AS_KW)?;
            let start = leading_whitespace_start(&keyword);
            Some(vec![(TextRange::new(start, pattern.text_range().end()), String::new())])
        }
        _ => Some(vec![(range, "_".to_string())]),
    }
}
