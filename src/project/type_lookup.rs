//! Type alias lookup across the project.

use smol_str::SmolStr;

use super::workspace::{SourceFiles, TreeContainer};
use crate::parser::ast::{TypeAliasDeclaration, first_token, qid_segments};
use crate::parser::{SyntaxKind, SyntaxNode};

/// Alias chains longer than this are treated as unresolvable.
const MAX_ALIAS_DEPTH: usize = 8;

/// Answers questions about declared types.
pub trait TypeLookup {
    /// Field names of the record type that the alias `name` stands for,
    /// as seen from `tree`. `None` if it is not a record alias or cannot be
    /// found.
    fn record_fields(&self, tree: &TreeContainer, name: &str) -> Option<Vec<SmolStr>>;
}

/// A lookup that knows nothing; every query fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTypeLookup;

impl TypeLookup for NoTypeLookup {
    fn record_fields(&self, _tree: &TreeContainer, _name: &str) -> Option<Vec<SmolStr>> {
        None
    }
}

/// Resolves aliases in the file itself and, through its resolved imports,
/// in the project files that define them.
pub struct ProjectTypeLookup<'a> {
    files: &'a dyn SourceFiles,
}

impl<'a> ProjectTypeLookup<'a> {
    pub fn new(files: &'a dyn SourceFiles) -> Self {
        Self { files }
    }

    fn lookup(&self, tree: &TreeContainer, name: &str, depth: usize) -> Option<Vec<SmolStr>> {
        if depth > MAX_ALIAS_DEPTH {
            tracing::trace!(name, "alias chain too deep");
            return None;
        }
        let (qualifier, base) = match name.rsplit_once('.') {
            Some((qualifier, base)) => (Some(qualifier), base),
            None => (None, name),
        };

        if qualifier.is_none() {
            if let Some(alias) = find_alias(tree, base) {
                return self.fields_of(tree, &alias.aliased_type()?, depth);
            }
        }

        for module in candidate_modules(tree, qualifier, base) {
            let Some(uri) = tree.resolved_modules().file(&module) else {
                continue;
            };
            let Some(other) = self.files.tree(uri) else {
                continue;
            };
            if let Some(alias) = find_alias(&other, base) {
                return self.fields_of(&other, &alias.aliased_type()?, depth);
            }
        }
        None
    }

    fn fields_of(
        &self,
        tree: &TreeContainer,
        ty: &SyntaxNode,
        depth: usize,
    ) -> Option<Vec<SmolStr>> {
        match ty.kind() {
            SyntaxKind::RECORD_TYPE => Some(
                ty.children()
                    .filter(|n| n.kind() == SyntaxKind::FIELD_TYPE)
                    .filter_map(|field| first_token(&field, SyntaxKind::LOWER_IDENT))
                    .map(|t| SmolStr::new(t.text()))
                    .collect(),
            ),
            SyntaxKind::TYPE_REF => {
                let qid = ty
                    .children()
                    .find(|n| n.kind() == SyntaxKind::UPPER_CASE_QID)?;
                self.lookup(tree, &qid_segments(&qid).join("."), depth + 1)
            }
            // Parenthesised type
            SyntaxKind::TYPE_EXPRESSION if ty.children().count() == 1 => {
                self.fields_of(tree, &ty.first_child()?, depth)
            }
            _ => None,
        }
    }
}

impl TypeLookup for ProjectTypeLookup<'_> {
    fn record_fields(&self, tree: &TreeContainer, name: &str) -> Option<Vec<SmolStr>> {
        self.lookup(tree, name, 0)
    }
}

fn find_alias(tree: &TreeContainer, name: &str) -> Option<TypeAliasDeclaration> {
    tree.source_file()?
        .type_aliases()
        .find(|alias| alias.name().as_deref() == Some(name))
}

/// Modules a type name may come from: the one its qualifier names, or every
/// import exposing it (explicitly or through `(..)`).
fn candidate_modules(tree: &TreeContainer, qualifier: Option<&str>, name: &str) -> Vec<String> {
    if let Some(qualifier) = qualifier {
        let module = tree
            .resolved_modules()
            .module_for_qualifier(qualifier)
            .unwrap_or(qualifier);
        return vec![module.to_string()];
    }
    let Some(file) = tree.source_file() else {
        return Vec::new();
    };
    file.imports()
        .filter(|import| {
            import.exposing_list().is_some_and(|list| {
                list.is_wildcard() || list.items().any(|item| item.name().as_deref() == Some(name))
            })
        })
        .filter_map(|import| import.module_name())
        .collect()
}
