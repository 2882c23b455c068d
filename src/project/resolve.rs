//! Import resolution: module name → file implementing it.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::FileUri;
use crate::parser::ast::SourceFile;

/// Modules every Elm file sees without importing them, with the qualifier
/// they are available under.
pub const VIRTUAL_IMPORTS: &[(&str, &str)] = &[
    ("Basics", "Basics"),
    ("List", "List"),
    ("Maybe", "Maybe"),
    ("Result", "Result"),
    ("String", "String"),
    ("Char", "Char"),
    ("Tuple", "Tuple"),
    ("Debug", "Debug"),
    ("Platform", "Platform"),
    ("Platform.Cmd", "Cmd"),
    ("Platform.Sub", "Sub"),
];

/// Where an imported module lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleTarget {
    /// A file of the project
    File(FileUri),
    /// An implicit import not backed by a project file
    Virtual,
}

/// The modules one file can see, keyed by module name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedModules {
    modules: FxHashMap<SmolStr, ModuleTarget>,
    /// Qualifier (alias or full name) → module name
    qualifiers: FxHashMap<SmolStr, SmolStr>,
}

impl ResolvedModules {
    pub fn get(&self, module: &str) -> Option<&ModuleTarget> {
        self.modules.get(module)
    }

    /// The file a module resolved to, if it is part of the project
    pub fn file(&self, module: &str) -> Option<&FileUri> {
        match self.modules.get(module)? {
            ModuleTarget::File(uri) => Some(uri),
            ModuleTarget::Virtual => None,
        }
    }

    /// Module name a qualifier such as `D` in `D.string` stands for
    pub fn module_for_qualifier(&self, qualifier: &str) -> Option<&str> {
        self.qualifiers.get(qualifier).map(|m| m.as_str())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &ModuleTarget)> {
        self.modules.iter()
    }

    fn insert(&mut self, module: &str, qualifier: &str, target: ModuleTarget) {
        self.modules.insert(SmolStr::new(module), target);
        self.qualifiers
            .insert(SmolStr::new(qualifier), SmolStr::new(module));
    }
}

/// Canonical relative path of a module: `Json.Decode` → `Json/Decode.elm`
pub fn module_path(module: &str) -> String {
    format!("{}.elm", module.replace('.', "/"))
}

/// Resolve every import of `file` against the project file set.
///
/// `exists` answers whether a URI is a parsed file of the project. Imports
/// that resolve nowhere are left out; virtual imports are always present.
pub fn resolve_imports(
    file: &SourceFile,
    source_dirs: &[FileUri],
    exists: impl Fn(&FileUri) -> bool,
) -> ResolvedModules {
    let locate = |module: &str| {
        let relative = module_path(module);
        source_dirs
            .iter()
            .map(|dir| dir.join(&relative))
            .find(|uri| exists(uri))
    };

    let mut resolved = ResolvedModules::default();
    for (module, qualifier) in VIRTUAL_IMPORTS {
        let target = locate(module)
            .map(ModuleTarget::File)
            .unwrap_or(ModuleTarget::Virtual);
        resolved.insert(module, qualifier, target);
    }

    for import in file.imports() {
        let Some(module) = import.module_name() else {
            continue;
        };
        match locate(&module) {
            Some(uri) => {
                let qualifier = import.qualifier().unwrap_or_else(|| module.clone());
                resolved.insert(&module, &qualifier, ModuleTarget::File(uri));
            }
            None if resolved.get(&module).is_some() => {
                // Re-importing a virtual module under an alias
                if let Some(alias) = import.alias() {
                    resolved.qualifiers.insert(SmolStr::new(alias), SmolStr::new(&module));
                }
            }
            None => {
                tracing::trace!(module = %module, "import not resolved in project");
            }
        }
    }
    resolved
}
