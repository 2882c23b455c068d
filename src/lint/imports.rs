//! Unused imports, unused exposed names, unused aliases.

use super::{LintCode, LintContext};
use crate::parser::ast::{ExposedItem, Import};
use crate::parser::{AstNode, SyntaxKind};

/// Is `item`, exposed by an import, used in the file?
fn exposed_item_used(ctx: &LintContext<'_>, item: &ExposedItem) -> bool {
    let Some(name) = item.name() else {
        return true;
    };
    match item {
        ExposedItem::Value(_) => ctx.refs.uses_value(&name),
        ExposedItem::Type(_) => item.exposes_constructors() || ctx.refs.uses_upper(&name),
        ExposedItem::Operator(_) => ctx.refs.uses_operator(&name),
    }
}

fn exposes_everything(import: &Import) -> bool {
    import.exposing_list().is_some_and(|list| list.is_wildcard())
}

/// An import whose module is never used, neither qualified nor through any
/// of the names it exposes. Imports exposing `(..)` are left alone.
pub(super) fn unused_imports(ctx: &mut LintContext<'_>) {
    let imports: Vec<Import> = ctx.file.imports().collect();
    for import in imports {
        if exposes_everything(&import) {
            continue;
        }
        let (Some(module), Some(qualifier)) = (import.module_name(), import.qualifier()) else {
            continue;
        };
        if ctx.refs.uses_qualifier(&qualifier) {
            continue;
        }
        let exposed_used = import
            .exposing_list()
            .is_some_and(|list| list.items().any(|item| exposed_item_used(ctx, &item)));
        if exposed_used {
            continue;
        }
        ctx.report_node(
            LintCode::UnusedImport,
            format!("Unused import `{module}`"),
            import.syntax(),
        );
    }
}

/// An explicitly exposed name that is never referenced.
pub(super) fn unused_imported_values(ctx: &mut LintContext<'_>) {
    let imports: Vec<Import> = ctx.file.imports().collect();
    for import in imports {
        let Some(list) = import.exposing_list() else {
            continue;
        };
        if list.is_wildcard() {
            continue;
        }
        let module = import.module_name().unwrap_or_default();
        for item in list.items() {
            if exposed_item_used(ctx, &item) {
                continue;
            }
            let name = item.name().unwrap_or_default();
            ctx.report_node(
                LintCode::UnusedImportedValue,
                format!("`{name}` is exposed from `{module}` but never used"),
                item.syntax(),
            );
        }
    }
}

/// An `as` alias that no qualified name uses.
pub(super) fn unused_aliases(ctx: &mut LintContext<'_>) {
    let imports: Vec<Import> = ctx.file.imports().collect();
    for import in imports {
        let Some(alias) = import.alias() else {
            continue;
        };
        if ctx.refs.uses_qualifier(&alias) {
            continue;
        }
        let Some(clause) = import
            .syntax()
            .children()
            .find(|n| n.kind() == SyntaxKind::AS_CLAUSE)
        else {
            continue;
        };
        ctx.report_node(
            LintCode::UnusedAlias,
            format!("Unused import alias `{alias}`"),
            &clause,
        );
    }
}
