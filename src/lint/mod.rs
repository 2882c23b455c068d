//! Lint analysis over one file's syntax tree.
//!
//! Every check is a function from the file (its tree, resolved modules and
//! a type lookup) to diagnostics. Checks run in a fixed order and each
//! reports in document order, so the output for an unchanged tree is
//! always the same list.

mod bindings;
mod declarations;
mod imports;
pub mod pattern;
pub mod scope;
mod style;

use std::fmt;

use rowan::TextRange;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticTag};
use crate::parser::ast::significant_range;
use crate::parser::{SourceFile, SyntaxNode};
use crate::project::{TreeContainer, TypeLookup};

use scope::References;

/// Codes of the lint checks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LintCode {
    UnusedImport,
    UnusedImportedValue,
    UnusedAlias,
    UnusedPattern,
    UnusedTopLevel,
    MapNothingToNothing,
    BooleanCaseExpr,
    DropConcatOfLists,
    DropConsOfItemAndList,
    UseConsOverConcat,
    SingleFieldRecord,
    UnnecessaryListConcat,
    UnnecessaryPortModule,
    NoUncurriedPrefix,
    UnusedTypeAlias,
    UnusedValueConstructor,
}

impl LintCode {
    pub const ALL: [LintCode; 16] = [
        Self::UnusedImport,
        Self::UnusedImportedValue,
        Self::UnusedAlias,
        Self::UnusedPattern,
        Self::UnusedTopLevel,
        Self::MapNothingToNothing,
        Self::BooleanCaseExpr,
        Self::DropConcatOfLists,
        Self::DropConsOfItemAndList,
        Self::UseConsOverConcat,
        Self::SingleFieldRecord,
        Self::UnnecessaryListConcat,
        Self::UnnecessaryPortModule,
        Self::NoUncurriedPrefix,
        Self::UnusedTypeAlias,
        Self::UnusedValueConstructor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnusedImport => "unused_import",
            Self::UnusedImportedValue => "unused_imported_value",
            Self::UnusedAlias => "unused_alias",
            Self::UnusedPattern => "unused_pattern",
            Self::UnusedTopLevel => "unused_top_level",
            Self::MapNothingToNothing => "map_nothing_to_nothing",
            Self::BooleanCaseExpr => "boolean_case_expr",
            Self::DropConcatOfLists => "drop_concat_of_lists",
            Self::DropConsOfItemAndList => "drop_cons_of_item_and_list",
            Self::UseConsOverConcat => "use_cons_over_concat",
            Self::SingleFieldRecord => "single_field_record",
            Self::UnnecessaryListConcat => "unnecessary_list_concat",
            Self::UnnecessaryPortModule => "unnecessary_port_module",
            Self::NoUncurriedPrefix => "no_uncurried_prefix",
            Self::UnusedTypeAlias => "unused_type_alias",
            Self::UnusedValueConstructor => "unused_value_constructor",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Lints about code that can be deleted carry the `unnecessary` tag.
    fn is_unnecessary(&self) -> bool {
        matches!(
            self,
            Self::UnusedImport
                | Self::UnusedImportedValue
                | Self::UnusedAlias
                | Self::UnusedPattern
                | Self::UnusedTopLevel
                | Self::UnusedTypeAlias
                | Self::UnusedValueConstructor
        )
    }
}

impl fmt::Display for LintCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a check can look at, plus the output buffer.
pub(crate) struct LintContext<'a> {
    pub tree: &'a TreeContainer,
    pub file: SourceFile,
    pub root: SyntaxNode,
    pub lookup: &'a dyn TypeLookup,
    pub refs: References,
    disabled: &'a [LintCode],
    diagnostics: Vec<Diagnostic>,
}

impl LintContext<'_> {
    pub fn report(&mut self, code: LintCode, message: impl Into<String>, range: TextRange) {
        if self.disabled.contains(&code) {
            return;
        }
        let span = self.tree.line_index().span(range);
        let mut diagnostic = Diagnostic::warning(code.as_str(), message.into(), span)
            .with_kind(DiagnosticKind::Lint);
        if code.is_unnecessary() {
            diagnostic = diagnostic.with_tag(DiagnosticTag::Unnecessary);
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn report_node(&mut self, code: LintCode, message: impl Into<String>, node: &SyntaxNode) {
        self.report(code, message, significant_range(node));
    }

    /// Report over the source from the start of `first` to the end of `last`.
    pub fn report_between(
        &mut self,
        code: LintCode,
        message: impl Into<String>,
        first: &SyntaxNode,
        last: &SyntaxNode,
    ) {
        let range = significant_range(first).cover(significant_range(last));
        self.report(code, message, range);
    }

    pub fn module_exposes_all(&self) -> bool {
        // A file without a header is an application `Main` exposing everything
        self.file
            .module_declaration()
            .is_none_or(|header| header.exposes_all())
    }
}

/// Run every enabled check on one file.
pub fn lint_file(
    tree: &TreeContainer,
    lookup: &dyn TypeLookup,
    disabled: &[LintCode],
) -> Vec<Diagnostic> {
    let Some(file) = tree.source_file() else {
        return Vec::new();
    };
    let root = tree.root();
    let mut ctx = LintContext {
        tree,
        refs: References::collect(&root),
        file,
        root,
        lookup,
        disabled,
        diagnostics: Vec::new(),
    };

    imports::unused_imports(&mut ctx);
    imports::unused_imported_values(&mut ctx);
    imports::unused_aliases(&mut ctx);
    bindings::unused_bindings(&mut ctx);
    style::map_nothing_to_nothing(&mut ctx);
    style::boolean_case_expr(&mut ctx);
    style::drop_concat_of_lists(&mut ctx);
    style::drop_cons_of_item_and_list(&mut ctx);
    style::use_cons_over_concat(&mut ctx);
    style::single_field_record(&mut ctx);
    style::unnecessary_list_concat(&mut ctx);
    declarations::unnecessary_port_module(&mut ctx);
    style::no_uncurried_prefix(&mut ctx);
    declarations::unused_type_aliases(&mut ctx);
    declarations::unused_value_constructors(&mut ctx);

    tracing::trace!(
        uri = %tree.uri(),
        count = ctx.diagnostics.len(),
        "lint finished"
    );
    ctx.diagnostics
}
