//! Typed AST wrappers over the untyped rowan CST.
//!
//! Only the module-level structure is typed: module header, imports,
//! exposing lists and top-level declarations. Expression-level analysis
//! works on the raw `SyntaxNode`s.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};
use rowan::{TextRange, TextSize};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

macro_rules! has_token_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token.")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
}

macro_rules! name_token_method {
    ($kind:ident) => {
        /// The declared name
        pub fn name(&self) -> Option<String> {
            first_token(&self.0, SyntaxKind::$kind).map(|t| t.text().to_string())
        }

        /// The token holding the declared name
        pub fn name_token(&self) -> Option<SyntaxToken> {
            first_token(&self.0, SyntaxKind::$kind)
        }
    };
}

// ============================================================================
// Helper functions
// ============================================================================

#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

/// First direct child token of `kind`
pub fn first_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Range of `node` without leading or trailing trivia.
pub fn significant_range(node: &SyntaxNode) -> TextRange {
    let mut tokens = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia());
    let Some(first) = tokens.next() else {
        return TextRange::empty(node.text_range().start());
    };
    let end = tokens
        .last()
        .map(|t| t.text_range().end())
        .unwrap_or_else(|| first.text_range().end());
    TextRange::new(first.text_range().start(), end)
}

/// Source text of `node` without leading or trailing trivia.
pub fn significant_text(node: &SyntaxNode) -> String {
    let range = significant_range(node);
    let offset = node.text_range().start();
    let text = node.text().to_string();
    let start = usize::from(range.start() - offset);
    let end = usize::from(range.end() - offset);
    text[start..end].to_string()
}

/// Dotted text of a qualified name node (`VALUE_QID`, `UPPER_CASE_QID`).
pub fn qid_segments(node: &SyntaxNode) -> Vec<String> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| matches!(t.kind(), SyntaxKind::UPPER_IDENT | SyntaxKind::LOWER_IDENT))
        .map(|t| t.text().to_string())
        .collect()
}

/// Start of the first non-trivia token at or after `offset` in the tree.
pub fn next_significant_offset(root: &SyntaxNode, offset: TextSize) -> Option<TextSize> {
    root.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia() && t.text_range().start() >= offset)
        .map(|t| t.text_range().start())
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, FILE);

impl SourceFile {
    first_child_method!(module_declaration, ModuleDeclaration);
    children_method!(imports, Import);
    children_method!(value_declarations, ValueDeclaration);
    children_method!(type_declarations, TypeDeclaration);
    children_method!(type_aliases, TypeAliasDeclaration);
    children_method!(type_annotations, TypeAnnotation);

    /// Name of the module, if the file has a header
    pub fn module_name(&self) -> Option<String> {
        self.module_declaration().and_then(|m| m.name())
    }
}

// ============================================================================
// Module header and imports
// ============================================================================

ast_node!(ModuleDeclaration, MODULE_DECLARATION);

impl ModuleDeclaration {
    has_token_method!(is_port_module, PORT_KW);
    first_child_method!(exposing_list, ExposingList);

    pub fn name(&self) -> Option<String> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::UPPER_CASE_QID)
            .map(|n| qid_segments(&n).join("."))
    }

    /// True for `module M exposing (..)`
    pub fn exposes_all(&self) -> bool {
        self.exposing_list().is_some_and(|list| list.is_wildcard())
    }
}

ast_node!(Import, IMPORT_CLAUSE);

impl Import {
    first_child_method!(exposing_list, ExposingList);

    /// The imported module name (`Json.Decode`)
    pub fn module_name(&self) -> Option<String> {
        self.module_name_node().map(|n| qid_segments(&n).join("."))
    }

    pub fn module_name_node(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::UPPER_CASE_QID)
    }

    /// Alias from `import Json.Decode as D`
    pub fn alias(&self) -> Option<String> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::AS_CLAUSE)
            .and_then(|clause| first_token(&clause, SyntaxKind::UPPER_IDENT))
            .map(|t| t.text().to_string())
    }

    /// The name used to qualify references: the alias, else the module name
    pub fn qualifier(&self) -> Option<String> {
        self.alias().or_else(|| self.module_name())
    }
}

ast_node!(ExposingList, EXPOSING_LIST);

impl ExposingList {
    has_token_method!(is_wildcard, DOT_DOT);
    children_method!(items, ExposedItem);
}

/// One entry of an exposing list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExposedItem {
    Value(SyntaxNode),
    Type(SyntaxNode),
    Operator(SyntaxNode),
}

impl AstNode for ExposedItem {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::EXPOSED_VALUE | SyntaxKind::EXPOSED_TYPE | SyntaxKind::EXPOSED_OPERATOR
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::EXPOSED_VALUE => Some(Self::Value(node)),
            SyntaxKind::EXPOSED_TYPE => Some(Self::Type(node)),
            SyntaxKind::EXPOSED_OPERATOR => Some(Self::Operator(node)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Value(n) | Self::Type(n) | Self::Operator(n) => n,
        }
    }
}

impl ExposedItem {
    /// Exposed name; operators are reported without parentheses
    pub fn name(&self) -> Option<String> {
        let kind = match self {
            Self::Value(_) => SyntaxKind::LOWER_IDENT,
            Self::Type(_) => SyntaxKind::UPPER_IDENT,
            Self::Operator(_) => SyntaxKind::OPERATOR_IDENT,
        };
        first_token(self.syntax(), kind).map(|t| t.text().to_string())
    }

    /// True for `Type(..)`
    pub fn exposes_constructors(&self) -> bool {
        matches!(self, Self::Type(n) if n.children().any(|c| c.kind() == SyntaxKind::EXPOSED_UNION_CONSTRUCTORS))
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(ValueDeclaration, VALUE_DECLARATION);

impl ValueDeclaration {
    /// `f` of `f x y = ...`; `None` for destructuring declarations
    pub fn function_left(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::FUNCTION_DECLARATION_LEFT)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.function_left()
            .and_then(|left| first_token(&left, SyntaxKind::LOWER_IDENT))
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    /// The pattern of a destructuring declaration (`( a, b ) = pair`)
    pub fn pattern(&self) -> Option<SyntaxNode> {
        self.0.children().find(|n| n.kind().is_pattern())
    }

    /// The expression after `=`
    pub fn body(&self) -> Option<SyntaxNode> {
        self.0.children().filter(|n| n.kind().is_expression()).last()
    }
}

ast_node!(TypeAnnotation, TYPE_ANNOTATION);

impl TypeAnnotation {
    name_token_method!(LOWER_IDENT);
}

ast_node!(TypeDeclaration, TYPE_DECLARATION);

impl TypeDeclaration {
    name_token_method!(UPPER_IDENT);
    children_method!(variants, UnionVariant);
}

ast_node!(UnionVariant, UNION_VARIANT);

impl UnionVariant {
    name_token_method!(UPPER_IDENT);
}

ast_node!(TypeAliasDeclaration, TYPE_ALIAS_DECLARATION);

impl TypeAliasDeclaration {
    name_token_method!(UPPER_IDENT);

    /// The aliased type expression
    pub fn aliased_type(&self) -> Option<SyntaxNode> {
        self.0.children().last()
    }
}
