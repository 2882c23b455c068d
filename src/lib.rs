//! # elmls-base
//!
//! Incremental diagnostics core for an Elm language server.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide          → Quick fixes for lint diagnostics
//!   ↓
//! diagnostics  → Per-file diagnostics, producers, the coordinator
//!   ↓
//! schedule     → Cooperative multistep scheduler
//!   ↓
//! lint         → Tree-pattern and scope based checks
//!   ↓
//! project      → Workspace, module resolution, type lookup
//!   ↓
//! parser       → Logos lexer, lossless rowan parser, typed AST
//!   ↓
//! base         → Primitives (FileUri, LineIndex, Span)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → project → lint → diagnostics → ide)
// ============================================================================

/// Foundation types: FileUri, LineIndex, Span
pub mod base;

/// Parser: Logos lexer, layout-aware recursive-descent parser, typed AST
pub mod parser;

/// Project model: workspace, module resolution, type lookup
pub mod project;

/// Lint analysis engine
pub mod lint;

/// Cooperative multistep scheduler
pub mod schedule;

/// Diagnostics coordination and publishing
pub mod diagnostics;

/// IDE features: quick fixes
pub mod ide;

// Re-export foundation types
pub use base::{FileUri, LineIndex, Position, Span, TextRange, TextSize};

// Re-export the main entry points
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsProvider, DiagnosticsSettings};
pub use lint::{LintCode, lint_file};
pub use project::{SourceFiles, TreeContainer, Workspace};
pub use schedule::{Multistep, MultistepScheduler, Next, RunOutcome};
