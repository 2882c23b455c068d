//! Project model: parsed files, module resolution and type lookup.
//!
//! The diagnostics coordinator only sees the [`SourceFiles`] trait; the
//! in-memory [`Workspace`] is the implementation the crate ships.

mod resolve;
mod type_lookup;
mod workspace;

pub use resolve::{ModuleTarget, ResolvedModules, VIRTUAL_IMPORTS, module_path, resolve_imports};
pub use type_lookup::{NoTypeLookup, ProjectTypeLookup, TypeLookup};
pub use workspace::{SourceFiles, TreeContainer, Workspace};
