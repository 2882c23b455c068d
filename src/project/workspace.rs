//! In-memory workspace: the parsed files of one project.

use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::resolve::{ResolvedModules, resolve_imports};
use crate::base::{FileUri, LineIndex};
use crate::parser::{AstNode, Parse, SourceFile, SyntaxNode, parse};

/// What the diagnostics coordinator needs to know about the project.
pub trait SourceFiles: Send + Sync {
    /// The live tree of a file, `None` once it is deleted.
    fn tree(&self, uri: &FileUri) -> Option<Arc<TreeContainer>>;

    /// Files currently open in the editor
    fn open_files(&self) -> Vec<FileUri>;

    /// Files of the project the user can edit (not packages)
    fn writable_files(&self) -> Vec<FileUri>;
}

/// One parsed file with everything derived from it.
///
/// Immutable; a new container replaces the old one on every change.
#[derive(Debug, Clone)]
pub struct TreeContainer {
    uri: FileUri,
    module_name: Option<SmolStr>,
    parse: Parse,
    line_index: LineIndex,
    resolved_modules: ResolvedModules,
    writable: bool,
}

impl TreeContainer {
    /// Parse `text` into a container with no resolved imports.
    pub fn new(uri: FileUri, text: &str, writable: bool) -> Self {
        let parse = parse(text);
        let module_name = SourceFile::cast(parse.syntax())
            .and_then(|file| file.module_name())
            .map(SmolStr::from);
        Self {
            uri,
            module_name,
            parse,
            line_index: LineIndex::new(text),
            resolved_modules: ResolvedModules::default(),
            writable,
        }
    }

    pub fn uri(&self) -> &FileUri {
        &self.uri
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    /// Root node of the tree
    pub fn root(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.root())
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn resolved_modules(&self) -> &ResolvedModules {
        &self.resolved_modules
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    fn with_resolved_modules(&self, resolved_modules: ResolvedModules) -> Self {
        Self {
            resolved_modules,
            ..self.clone()
        }
    }
}

#[derive(Debug, Default)]
struct WorkspaceState {
    files: FxHashMap<FileUri, Arc<TreeContainer>>,
    open: IndexSet<FileUri>,
}

/// Thread-safe in-memory project.
///
/// Every mutation takes the write lock briefly; readers get `Arc` snapshots
/// of the containers and never hold the lock while analysing.
#[derive(Debug)]
pub struct Workspace {
    source_dirs: Vec<FileUri>,
    state: RwLock<WorkspaceState>,
}

impl Workspace {
    /// Create a workspace whose modules live under `source_dirs`
    /// (the `source-directories` of `elm.json`, as URIs).
    pub fn new(source_dirs: Vec<FileUri>) -> Self {
        Self {
            source_dirs,
            state: RwLock::new(WorkspaceState::default()),
        }
    }

    pub fn source_dirs(&self) -> &[FileUri] {
        &self.source_dirs
    }

    /// Add or replace a file and return its new container.
    ///
    /// A new file changes the module graph, so every file's imports are
    /// resolved again; an edit to a known file only resolves that file.
    pub fn set_file(&self, uri: FileUri, text: &str, writable: bool) -> Arc<TreeContainer> {
        let container = TreeContainer::new(uri.clone(), text, writable);
        let mut state = self.state.write();
        let is_new = !state.files.contains_key(&uri);

        let resolved = self.resolve(&state, &container, |candidate| candidate == &uri);
        let container = Arc::new(container.with_resolved_modules(resolved));
        state.files.insert(uri.clone(), container.clone());

        if is_new {
            tracing::debug!(uri = %uri, "file added, re-resolving imports");
            self.resolve_all(&mut state);
        }
        container
    }

    /// Remove a file from the project. Returns whether it existed.
    pub fn remove(&self, uri: &FileUri) -> bool {
        let mut state = self.state.write();
        state.open.shift_remove(uri);
        let existed = state.files.remove(uri).is_some();
        if existed {
            tracing::debug!(uri = %uri, "file removed, re-resolving imports");
            self.resolve_all(&mut state);
        }
        existed
    }

    pub fn open(&self, uri: &FileUri) {
        self.state.write().open.insert(uri.clone());
    }

    pub fn close(&self, uri: &FileUri) {
        self.state.write().open.shift_remove(uri);
    }

    pub fn file_count(&self) -> usize {
        self.state.read().files.len()
    }

    fn resolve_all(&self, state: &mut WorkspaceState) {
        let snapshot: &WorkspaceState = state;
        let updated: Vec<(FileUri, Arc<TreeContainer>)> = snapshot
            .files
            .iter()
            .map(|(uri, container)| {
                let resolved = self.resolve(snapshot, container, |_| false);
                (uri.clone(), Arc::new(container.with_resolved_modules(resolved)))
            })
            .collect();
        state.files.extend(updated);
    }

    /// Resolve the imports of `container` against the files in `state`,
    /// plus any URI `also_exists` accepts.
    fn resolve(
        &self,
        state: &WorkspaceState,
        container: &TreeContainer,
        also_exists: impl Fn(&FileUri) -> bool,
    ) -> ResolvedModules {
        match container.source_file() {
            Some(file) => resolve_imports(&file, &self.source_dirs, |candidate| {
                state.files.contains_key(candidate) || also_exists(candidate)
            }),
            None => ResolvedModules::default(),
        }
    }
}

impl SourceFiles for Workspace {
    fn tree(&self, uri: &FileUri) -> Option<Arc<TreeContainer>> {
        self.state.read().files.get(uri).cloned()
    }

    fn open_files(&self) -> Vec<FileUri> {
        let state = self.state.read();
        state
            .open
            .iter()
            .filter(|uri| state.files.contains_key(*uri))
            .cloned()
            .collect()
    }

    fn writable_files(&self) -> Vec<FileUri> {
        let state = self.state.read();
        let mut uris: Vec<FileUri> = state
            .files
            .values()
            .filter(|c| c.is_writable())
            .map(|c| c.uri().clone())
            .collect();
        uris.sort();
        uris
    }
}
