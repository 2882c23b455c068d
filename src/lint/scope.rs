//! Name bindings, their scopes, and the references that use them.
//!
//! Matching is textual: a reference is any occurrence of the same name
//! inside the binding's scope. Shadowing is not modelled.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::parser::ast::{first_token, qid_segments};
use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};

/// A name-introducing occurrence
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: SmolStr,
    /// The node to report on (a `LOWER_PATTERN` or `FUNCTION_DECLARATION_LEFT`)
    pub node: SyntaxNode,
    /// The name token itself
    pub token: SyntaxToken,
    /// Region searched for references
    pub scope: SyntaxNode,
}

/// Every pattern-bound name and every `let` function name in the tree,
/// in document order. Top-level function names are not included.
pub fn local_bindings(root: &SyntaxNode) -> Vec<Binding> {
    root.descendants()
        .filter_map(|node| match node.kind() {
            SyntaxKind::LOWER_PATTERN => {
                let token = first_token(&node, SyntaxKind::LOWER_IDENT)?;
                let scope = binding_scope(&node)?;
                Some(Binding {
                    name: SmolStr::new(token.text()),
                    node,
                    token,
                    scope,
                })
            }
            SyntaxKind::FUNCTION_DECLARATION_LEFT => {
                let decl = node.parent()?;
                let let_expr = decl.parent().filter(|p| p.kind() == SyntaxKind::LET_IN_EXPR)?;
                let token = first_token(&node, SyntaxKind::LOWER_IDENT)?;
                Some(Binding {
                    name: SmolStr::new(token.text()),
                    node,
                    token,
                    scope: let_expr,
                })
            }
            _ => None,
        })
        .collect()
}

/// The region a pattern binding is visible in.
///
/// The nearest enclosing declaration, case branch or lambda; for a `let`
/// declaration the scope widens to the whole `let ... in` when the binding
/// is the declaration's own pattern (`x = ...`) or a direct field/element of
/// a record or tuple pattern at that level (`( a, b ) = ...`). Deeper
/// patterns and the parameters of `let` functions stay scoped to their
/// declaration.
pub fn binding_scope(pattern: &SyntaxNode) -> Option<SyntaxNode> {
    let scope = pattern.ancestors().skip(1).find(|n| {
        matches!(
            n.kind(),
            SyntaxKind::VALUE_DECLARATION
                | SyntaxKind::CASE_OF_BRANCH
                | SyntaxKind::ANONYMOUS_FUNCTION_EXPR
        )
    })?;

    if scope.kind() == SyntaxKind::VALUE_DECLARATION {
        if let Some(let_expr) = scope.parent().filter(|p| p.kind() == SyntaxKind::LET_IN_EXPR) {
            if binds_at_declaration_level(pattern, &scope) {
                return Some(let_expr);
            }
        }
    }
    Some(scope)
}

fn binds_at_declaration_level(pattern: &SyntaxNode, declaration: &SyntaxNode) -> bool {
    let Some(parent) = pattern.parent() else {
        return false;
    };
    if parent == *declaration {
        return true;
    }
    matches!(
        parent.kind(),
        SyntaxKind::RECORD_PATTERN | SyntaxKind::TUPLE_PATTERN
    ) && parent.parent().as_ref() == Some(declaration)
}

/// Name of an unqualified value reference: `x` as an expression, or the
/// record in `{ x | field = ... }`.
pub fn value_reference(node: &SyntaxNode) -> Option<SmolStr> {
    match node.kind() {
        SyntaxKind::VALUE_EXPR => {
            let qid = node.first_child().filter(|q| q.kind() == SyntaxKind::VALUE_QID)?;
            match qid_segments(&qid).as_slice() {
                [name] => Some(SmolStr::new(name)),
                _ => None,
            }
        }
        SyntaxKind::RECORD_BASE_IDENTIFIER
            if node.parent().is_some_and(|p| p.kind() == SyntaxKind::RECORD_EXPR) =>
        {
            first_token(node, SyntaxKind::LOWER_IDENT).map(|t| SmolStr::new(t.text()))
        }
        _ => None,
    }
}

/// Count references to `name` under `scope`.
pub fn count_references(scope: &SyntaxNode, name: &str) -> usize {
    scope
        .descendants()
        .filter(|n| value_reference(n).as_deref() == Some(name))
        .count()
}

/// Is this qualified name part of the module header or an import?
fn in_module_structure(qid: &SyntaxNode) -> bool {
    qid.parent().is_some_and(|p| {
        matches!(
            p.kind(),
            SyntaxKind::MODULE_DECLARATION | SyntaxKind::IMPORT_CLAUSE
        )
    })
}

/// File-wide reference summary used by the import and declaration checks.
#[derive(Debug, Default)]
pub struct References {
    /// Unqualified value references with the node they occur at
    pub values: Vec<(SmolStr, SyntaxNode)>,
    /// Unqualified upper-case names used as types, constructors or patterns
    pub upper: FxHashSet<SmolStr>,
    /// Module prefixes of qualified names (`Html.Attributes` in `Html.Attributes.class`)
    pub qualifiers: FxHashSet<SmolStr>,
    /// Operators used infix or as functions
    pub operators: FxHashSet<SmolStr>,
}

impl References {
    pub fn collect(root: &SyntaxNode) -> Self {
        let mut refs = Self::default();
        for node in root.descendants() {
            if let Some(name) = value_reference(&node) {
                refs.values.push((name, node.clone()));
            }
            match node.kind() {
                SyntaxKind::VALUE_QID | SyntaxKind::UPPER_CASE_QID if !in_module_structure(&node) => {
                    let segments = qid_segments(&node);
                    match segments.as_slice() {
                        [] => {}
                        [single] => {
                            if node.kind() == SyntaxKind::UPPER_CASE_QID {
                                refs.upper.insert(SmolStr::new(single));
                            }
                        }
                        [prefix @ .., _] => {
                            refs.qualifiers.insert(SmolStr::new(prefix.join(".")));
                        }
                    }
                }
                SyntaxKind::OPERATOR | SyntaxKind::OPERATOR_AS_FUNCTION_EXPR => {
                    if let Some(op) = first_token(&node, SyntaxKind::OPERATOR_IDENT) {
                        refs.operators.insert(SmolStr::new(op.text()));
                    }
                }
                _ => {}
            }
        }
        refs
    }

    pub fn uses_value(&self, name: &str) -> bool {
        self.values.iter().any(|(n, _)| n == name)
    }

    pub fn uses_upper(&self, name: &str) -> bool {
        self.upper.contains(name)
    }

    pub fn uses_qualifier(&self, qualifier: &str) -> bool {
        self.qualifiers.contains(qualifier)
    }

    pub fn uses_operator(&self, op: &str) -> bool {
        self.operators.contains(op)
    }
}
