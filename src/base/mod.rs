//! Foundation types for the Elm language server core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileUri`] - Interned document identifiers
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - [`Position`], [`Span`] - Zero-based line/column positions for diagnostics
//!
//! This module has NO dependencies on other elmls modules.

mod line_index;
mod position;
mod uri;

pub use line_index::LineIndex;
pub use position::{Position, Span};
pub use uri::FileUri;

pub use text_size::{TextRange, TextSize};

// Re-export text-size for convenience
pub use text_size;
