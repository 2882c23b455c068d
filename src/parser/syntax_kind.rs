//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! Node names follow the tree-sitter Elm grammar (`bin_op_expr`,
//! `case_of_branch`, `value_qid`, ...) so lint patterns read the same way.

/// All syntax kinds (tokens and nodes) of an Elm source file
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, expressions, patterns, types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,       // -- comment
    BLOCK_COMMENT,      // {- comment -} (nests)

    // =========================================================================
    // LITERALS
    // =========================================================================
    LOWER_IDENT,        // value, field, type variable
    UPPER_IDENT,        // Type, Constructor, Module segment
    NUMBER,             // 42, 3.14, 0xFF
    STRING,             // "hello", """multi"""
    CHAR,               // 'c'
    OPERATOR_IDENT,     // ++, ::, |>, ==, ...

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,            // (
    R_PAREN,            // )
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_BRACE,            // {
    R_BRACE,            // }
    COMMA,              // ,
    PIPE,               // |
    EQ,                 // =
    COLON,              // :
    ARROW,              // ->
    BACKSLASH,          // \
    DOT,                // .
    DOT_DOT,            // ..
    UNDERSCORE,         // _

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    MODULE_KW,
    PORT_KW,
    EXPOSING_KW,
    IMPORT_KW,
    AS_KW,
    TYPE_KW,
    ALIAS_KW,
    CASE_KW,
    OF_KW,
    IF_KW,
    THEN_KW,
    ELSE_KW,
    LET_KW,
    IN_KW,

    // =========================================================================
    // NODES - Module structure
    // =========================================================================
    FILE,
    MODULE_DECLARATION,
    EXPOSING_LIST,
    EXPOSED_VALUE,
    EXPOSED_TYPE,
    EXPOSED_UNION_CONSTRUCTORS, // the `(..)` of `Msg(..)`
    EXPOSED_OPERATOR,
    IMPORT_CLAUSE,
    AS_CLAUSE,

    // Declarations
    VALUE_DECLARATION,
    FUNCTION_DECLARATION_LEFT,
    TYPE_ANNOTATION,
    TYPE_DECLARATION,
    UNION_VARIANT,
    TYPE_ALIAS_DECLARATION,
    PORT_ANNOTATION,

    // Names
    VALUE_QID,
    UPPER_CASE_QID,

    // Types
    TYPE_EXPRESSION,
    TYPE_REF,
    TYPE_VARIABLE,
    RECORD_TYPE,
    FIELD_TYPE,
    RECORD_BASE_IDENTIFIER,
    TUPLE_TYPE,

    // Patterns
    LOWER_PATTERN,
    ANYTHING_PATTERN,
    UNION_PATTERN,
    RECORD_PATTERN,
    TUPLE_PATTERN,
    LIST_PATTERN,
    CONS_PATTERN,
    AS_PATTERN,
    PARENTHESIZED_PATTERN,
    LITERAL_PATTERN,

    // Expressions
    VALUE_EXPR,
    FUNCTION_CALL_EXPR,
    BIN_OP_EXPR,
    OPERATOR,
    NEGATE_EXPR,
    PARENTHESIZED_EXPR,
    OPERATOR_AS_FUNCTION_EXPR,
    UNIT_EXPR,
    TUPLE_EXPR,
    LIST_EXPR,
    RECORD_EXPR,
    FIELD,
    FIELD_ACCESS_EXPR,
    FIELD_ACCESSOR_FUNCTION_EXPR,
    ANONYMOUS_FUNCTION_EXPR,
    IF_ELSE_EXPR,
    CASE_OF_EXPR,
    CASE_OF_BRANCH,
    LET_IN_EXPR,
    LITERAL_EXPR,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::MODULE_KW as u16) && (self as u16) <= (Self::IN_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::UNDERSCORE as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(self, Self::NUMBER | Self::STRING | Self::CHAR)
    }

    /// Check if this node kind is a pattern
    pub fn is_pattern(self) -> bool {
        (self as u16) >= (Self::LOWER_PATTERN as u16)
            && (self as u16) <= (Self::LITERAL_PATTERN as u16)
    }

    /// Check if this node kind is an expression
    pub fn is_expression(self) -> bool {
        (self as u16) >= (Self::VALUE_EXPR as u16) && (self as u16) <= (Self::LITERAL_EXPR as u16)
            && !matches!(self, Self::OPERATOR | Self::FIELD | Self::CASE_OF_BRANCH)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElmLanguage {}

impl rowan::Language for ElmLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<ElmLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ElmLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ElmLanguage>;
