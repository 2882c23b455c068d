//! Rowan-based lossless parser for Elm
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```
//!
//! Node kinds are named after the tree-sitter Elm grammar, which is what the
//! lint patterns are written against.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod expressions;
mod lexer;
mod patterns;
mod syntax_kind;
mod types;

pub use ast::{AstNode, SourceFile};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{ElmLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
