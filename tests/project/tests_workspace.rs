//! Workspace module resolution and type lookup.

use smol_str::SmolStr;

use elmls::project::{ModuleTarget, ProjectTypeLookup, TypeLookup, VIRTUAL_IMPORTS};
use elmls::{FileUri, SourceFiles, Workspace};

const SRC: &str = "file:///project/src";
const TESTS: &str = "file:///project/tests";

fn workspace() -> Workspace {
    Workspace::new(vec![FileUri::new(SRC), FileUri::new(TESTS)])
}

const MAIN: &str = "module Main exposing (main)

import Geometry.Types as T exposing (Point)
import Fixtures
import Html

main : Point
main =
    Fixtures.origin
";

const TYPES: &str = "module Geometry.Types exposing (..)

type alias Point =
    { x : Float, y : Float }

type alias Located =
    Point
";

#[test]
fn test_imports_resolve_across_source_directories() {
    let ws = workspace();
    let main_uri = FileUri::new(format!("{SRC}/Main.elm"));
    let types_uri = FileUri::new(format!("{SRC}/Geometry/Types.elm"));
    let fixtures_uri = FileUri::new(format!("{TESTS}/Fixtures.elm"));

    ws.set_file(types_uri.clone(), TYPES, true);
    ws.set_file(fixtures_uri.clone(), "module Fixtures exposing (origin)\n\norigin =\n    0\n", false);
    let main = ws.set_file(main_uri.clone(), MAIN, true);

    let modules = main.resolved_modules();
    assert_eq!(modules.file("Geometry.Types"), Some(&types_uri));
    assert_eq!(modules.file("Fixtures"), Some(&fixtures_uri));
    assert_eq!(modules.module_for_qualifier("T"), Some("Geometry.Types"));
    // Not part of the project: silently left out
    assert_eq!(modules.get("Html"), None);

    for (module, qualifier) in VIRTUAL_IMPORTS {
        assert_eq!(modules.get(module), Some(&ModuleTarget::Virtual));
        assert_eq!(modules.module_for_qualifier(qualifier), Some(*module));
    }

    assert_eq!(ws.writable_files(), vec![types_uri, main_uri]);
}

#[test]
fn test_removing_a_module_unresolves_importers() {
    let ws = workspace();
    let main_uri = FileUri::new(format!("{SRC}/Main.elm"));
    let types_uri = FileUri::new(format!("{SRC}/Geometry/Types.elm"));
    ws.set_file(types_uri.clone(), TYPES, true);
    ws.set_file(main_uri.clone(), MAIN, true);

    assert!(ws.remove(&types_uri));
    let main = ws.tree(&main_uri).expect("main is still there");
    assert_eq!(main.resolved_modules().file("Geometry.Types"), None);
    assert!(!ws.remove(&types_uri));
}

#[test]
fn test_type_lookup_follows_imports() {
    let ws = workspace();
    ws.set_file(FileUri::new(format!("{SRC}/Geometry/Types.elm")), TYPES, true);
    let main = ws.set_file(FileUri::new(format!("{SRC}/Main.elm")), MAIN, true);

    let lookup = ProjectTypeLookup::new(&ws);
    let point = Some(vec![SmolStr::new("x"), SmolStr::new("y")]);
    assert_eq!(lookup.record_fields(&main, "Point"), point);
    assert_eq!(lookup.record_fields(&main, "T.Located"), point);
    // Not exposed by the import, and not qualified
    assert_eq!(lookup.record_fields(&main, "Located"), None);
}

#[test]
fn test_open_files_keep_open_order() {
    let ws = workspace();
    let a = FileUri::new(format!("{SRC}/A.elm"));
    let b = FileUri::new(format!("{SRC}/B.elm"));
    ws.set_file(a.clone(), "module A exposing (..)\n", true);
    ws.set_file(b.clone(), "module B exposing (..)\n", true);

    ws.open(&b);
    ws.open(&a);
    assert_eq!(ws.open_files(), vec![b.clone(), a.clone()]);

    ws.close(&b);
    assert_eq!(ws.open_files(), vec![a]);

    // Open but unknown files are not reported
    ws.open(&FileUri::new(format!("{SRC}/Ghost.elm")));
    assert_eq!(ws.open_files().len(), 1);
}
