//! IDE features built on the lint diagnostics.
//!
//! Pure functions over a [`TreeContainer`](crate::project::TreeContainer):
//! data in, edits out. Conversion to protocol types happens in the server.

mod code_actions;

pub use code_actions::{CodeAction, TextEdit, quick_fix, quick_fixes};
