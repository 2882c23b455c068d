//! Unused pattern-bound variables and unused top-level values.

use rowan::TextRange;
use rustc_hash::FxHashSet;

use super::scope::{count_references, local_bindings};
use super::{LintCode, LintContext};
use crate::parser::ast::ExposedItem;
use crate::parser::{AstNode, SyntaxNode};

/// The top-level item (a child of the file root) containing `node`.
fn top_level_item(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.ancestors()
        .find(|n| n.parent().is_some_and(|p| p.parent().is_none()))
}

pub(super) fn unused_bindings(ctx: &mut LintContext<'_>) {
    let mut findings: Vec<(TextRange, LintCode, String)> = Vec::new();

    for binding in local_bindings(&ctx.root) {
        if count_references(&binding.scope, &binding.name) == 0 {
            findings.push((
                binding.token.text_range(),
                LintCode::UnusedPattern,
                binding.name.to_string(),
            ));
        }
    }

    if !ctx.module_exposes_all() {
        let exposed: FxHashSet<String> = ctx
            .file
            .module_declaration()
            .and_then(|header| header.exposing_list())
            .map(|list| {
                list.items()
                    .filter(|item| matches!(item, ExposedItem::Value(_)))
                    .filter_map(|item| item.name())
                    .collect()
            })
            .unwrap_or_default();

        for decl in ctx.file.value_declarations() {
            let (Some(name), Some(token)) = (decl.name(), decl.name_token()) else {
                continue;
            };
            if exposed.contains(&name) {
                continue;
            }
            // Only uses from another top-level item count; recursion does not
            let own_item = decl.syntax().clone();
            let used_elsewhere = ctx.refs.values.iter().any(|(reference, node)| {
                reference == name.as_str()
                    && top_level_item(node).is_some_and(|item| item != own_item)
            });
            if !used_elsewhere {
                findings.push((token.text_range(), LintCode::UnusedTopLevel, name));
            }
        }
    }

    findings.sort_by_key(|(range, ..)| range.start());
    for (range, code, name) in findings {
        let message = match code {
            LintCode::UnusedTopLevel => format!("Unused top level definition `{name}`"),
            _ => format!("Unused variable `{name}`"),
        };
        ctx.report(code, message, range);
    }
}
