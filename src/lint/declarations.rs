//! Module-level declarations: port modules, type aliases, constructors.

use rustc_hash::FxHashSet;

use super::{LintCode, LintContext};
use crate::parser::ast::{TypeAliasDeclaration, TypeDeclaration};
use crate::parser::{AstNode, SyntaxKind};

/// Names the module header exposes, split into plain names and types
/// exposed with their constructors.
fn module_exposures(ctx: &LintContext<'_>) -> (FxHashSet<String>, FxHashSet<String>) {
    let mut names = FxHashSet::default();
    let mut with_constructors = FxHashSet::default();
    let items = ctx
        .file
        .module_declaration()
        .and_then(|header| header.exposing_list())
        .into_iter()
        .flat_map(|list| list.items().collect::<Vec<_>>());
    for item in items {
        let Some(name) = item.name() else {
            continue;
        };
        if item.exposes_constructors() {
            with_constructors.insert(name.clone());
        }
        names.insert(name);
    }
    (names, with_constructors)
}

/// A `port module` without any port.
pub(super) fn unnecessary_port_module(ctx: &mut LintContext<'_>) {
    let Some(header) = ctx.file.module_declaration() else {
        return;
    };
    if !header.is_port_module() {
        return;
    }
    let has_port = ctx
        .root
        .children()
        .any(|n| n.kind() == SyntaxKind::PORT_ANNOTATION);
    if !has_port {
        ctx.report_node(
            LintCode::UnnecessaryPortModule,
            "Module is declared as a port module but defines no ports",
            header.syntax(),
        );
    }
}

/// A type alias that is neither exposed nor referenced.
pub(super) fn unused_type_aliases(ctx: &mut LintContext<'_>) {
    if ctx.module_exposes_all() {
        return;
    }
    let (exposed, _) = module_exposures(ctx);
    let aliases: Vec<TypeAliasDeclaration> = ctx.file.type_aliases().collect();
    for alias in aliases {
        let (Some(name), Some(token)) = (alias.name(), alias.name_token()) else {
            continue;
        };
        if exposed.contains(&name) || ctx.refs.uses_upper(&name) {
            continue;
        }
        ctx.report(
            LintCode::UnusedTypeAlias,
            format!("Type alias `{name}` is not used"),
            token.text_range(),
        );
    }
}

/// A union variant that is never constructed or matched, in a type whose
/// constructors are not exposed.
pub(super) fn unused_value_constructors(ctx: &mut LintContext<'_>) {
    if ctx.module_exposes_all() {
        return;
    }
    let (_, with_constructors) = module_exposures(ctx);
    let types: Vec<TypeDeclaration> = ctx.file.type_declarations().collect();
    for ty in types {
        if ty.name().is_some_and(|name| with_constructors.contains(&name)) {
            continue;
        }
        for variant in ty.variants() {
            let (Some(name), Some(token)) = (variant.name(), variant.name_token()) else {
                continue;
            };
            if ctx.refs.uses_upper(&name) {
                continue;
            }
            ctx.report(
                LintCode::UnusedValueConstructor,
                format!("Value constructor `{name}` is not used"),
                token.text_range(),
            );
        }
    }
}
