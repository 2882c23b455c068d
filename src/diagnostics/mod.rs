//! Diagnostics: value types, per-file merging, and the coordinator that
//! keeps every open file's diagnostics current while the user types.
//!
//! Three producers feed the coordinator, one per [`DiagnosticKind`]:
//! - the lint engine ([`crate::lint`]), run in-process;
//! - a type checker ([`TypeInferenceDiagnostics`]);
//! - the native build ([`BuildDiagnostics`]).
//!
//! Each kind is replaced wholesale when it recomputes, and the editor
//! always receives the concatenation of all kinds through a
//! [`DiagnosticsSink`].

mod coordinator;
mod error;
mod file_diagnostics;
mod producers;
mod settings;
mod types;

pub use coordinator::DiagnosticsProvider;
pub use error::{DiagnosticsError, Result};
pub use file_diagnostics::FileDiagnostics;
pub use producers::{
    BoxFuture, BuildDiagnostics, DiagnosticsSink, NoBuild, NoTypeInference,
    TypeInferenceDiagnostics,
};
pub use settings::DiagnosticsSettings;
pub use types::{Diagnostic, DiagnosticKind, DiagnosticTag, SOURCE, Severity};
