//! Common source code fixtures for tests.

// Clean modules
pub const CLEAN_MODULE: &str = "module Main exposing (main)

main =
    1
";

pub const EXPOSE_ALL_MODULE: &str = "module Main exposing (..)

main =
    1
";

// One finding each
pub const UNUSED_IMPORT: &str = "module Main exposing (main)

import Foo exposing (bar)

main =
    1
";

pub const UNUSED_IMPORT_FIXED: &str = "module Main exposing (main)

main =
    1
";

pub const UNUSED_TOP_LEVEL: &str = "module Main exposing (main)

main =
    1

helper x =
    x
";

pub const USED_TOP_LEVEL: &str = "module Main exposing (main)

main =
    helper 1

helper x =
    x
";

pub const BOOLEAN_CASE: &str = "module Main exposing (f)

f b =
    case b of
        True ->
            1

        False ->
            2
";

pub const PORT_MODULE_WITHOUT_PORTS: &str = "port module Main exposing (main)

main =
    1
";

pub const PORT_MODULE_WITH_PORT: &str = "port module Main exposing (main, send)

port send : String -> Cmd msg

main =
    1
";

// A bit of everything, for idempotence
pub const KITCHEN_SINK: &str = "module Main exposing (main, view)

import Html exposing (Html, div, text)
import Html.Attributes as Attr
import List.Extra exposing (unique)

type Color
    = Red
    | Green

type alias Point =
    { x : Int }

type alias Unused =
    Int

main =
    view Red

view color =
    case color of
        Red ->
            div [] ([ text \"red\" ] ++ rest)

        Green ->
            text (String.fromInt ((+) 1 2))

rest =
    let
        a =
            1

        b =
            2
    in
    List.concat [ [ text \"x\" ], [ text (String.fromInt b) ] ]

pick m =
    case m of
        Nothing ->
            Nothing

        Just { value, other } ->
            Just value
";
