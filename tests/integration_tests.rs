//! Integration tests for the webir pipeline
//!
//! These tests drive the CLI entry point end to end:
//! - Extracting IR from declaration text
//! - Validating IR documents
//! - Emitting Gleam bindings to disk

use anyhow::Result;
use clap::Parser;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

use webir::cli::args::CliArgs;
use webir::cli::driver::{CliIo, run};
use webir::cli::reporter::Reporter;
use webir::{IrDocument, WebirError};

const NODE_ELEMENT_DTS: &str = r#"
interface Node {
    readonly nodeName: string;
}

interface Element extends Node {
    getAttribute(name: string): string;
}
"#;

/// Helper to run one command with in-memory standard streams
fn webir(cwd: &Path, argv: &[&str], stdin: &str) -> (Result<()>, String) {
    let mut full = vec!["webir"];
    full.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full).expect("arguments parse");

    let mut stdout = Vec::new();
    let mut input = Cursor::new(stdin.as_bytes().to_vec());
    let result = {
        let mut io = CliIo {
            stdout: &mut stdout,
            stdin: &mut input,
            stdin_is_terminal: stdin.is_empty(),
        };
        run(&args, cwd, &mut io)
    };
    (result, String::from_utf8(stdout).expect("utf-8"))
}

#[test]
fn test_extract_validate_emit_round_trip() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("lib.dom.d.ts"), NODE_ELEMENT_DTS).expect("fixture");

    let (result, _) = webir(
        temp.path(),
        &["extract", "--lib", "lib.dom.d.ts", "-o", "ir.json"],
        "",
    );
    result.expect("extract");

    let ir_text = fs::read_to_string(temp.path().join("ir.json")).expect("read IR");
    let document: IrDocument = serde_json::from_str(&ir_text).expect("IR deserializes");
    assert_eq!(document.extends.parents("Element"), ["Node".to_string()]);
    assert_eq!(document.ir.members("Element")[0].name(), "getAttribute");

    let (result, stdout) = webir(temp.path(), &["validate", "ir.json"], "");
    result.expect("validate");
    assert_eq!(stdout, "Schema validation passed\n");

    let (result, stdout) = webir(
        temp.path(),
        &["emit", "gleam", "--irFile", "ir.json", "-o", "bindings/gleam/twig"],
        "",
    );
    result.expect("emit");
    assert_eq!(stdout.lines().count(), 4);

    let src = temp.path().join("bindings/gleam/twig/src");
    let element = fs::read_to_string(src.join("element.gleam")).expect("element module");
    assert!(element.contains("pub type Element\n"));
    assert!(element.contains("pub fn get_attribute(el: JsRef(Element), name: String) -> String\n"));
    assert!(element.contains("pub fn node_name(el: JsRef(Element)) -> String\n"));

    let upcast = fs::read_to_string(src.join("upcast.gleam")).expect("upcast module");
    assert!(upcast.contains("pub fn element_as_node(el: JsRef(Element)) -> JsRef(Node)\n"));

    let twig = fs::read_to_string(src.join("twig.gleam")).expect("aggregator");
    assert!(twig.contains("pub const element_as_node = upcast.element_as_node\n"));
}

#[test]
fn test_emitting_twice_is_byte_identical() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("lib.dom.d.ts"), NODE_ELEMENT_DTS).expect("fixture");
    let argv = ["emit", "--lib", "lib.dom.d.ts", "-o", "out"];

    webir(temp.path(), &argv, "").0.expect("first emit");
    let first = fs::read(temp.path().join("out/src/element.gleam")).expect("read");
    webir(temp.path(), &argv, "").0.expect("second emit");
    let second = fs::read(temp.path().join("out/src/element.gleam")).expect("read");
    assert_eq!(first, second);
}

#[test]
fn test_malformed_stdin_fails_without_output() {
    let temp = TempDir::new().expect("temp dir");
    let (result, stdout) = webir(temp.path(), &["validate"], "{\"Node\": [");
    let err = result.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<WebirError>(),
        Some(WebirError::MalformedInput { origin, .. }) if origin == "<stdin>"
    ));
    assert!(stdout.is_empty());
    assert!(fs::read_dir(temp.path()).expect("list").next().is_none());
}

#[test]
fn test_violation_report_names_locations() {
    let temp = TempDir::new().expect("temp dir");
    let ir = r#"{ "Node": [{ "kind": "property", "interface": "Node", "name": "nodeName" }] }"#;
    let (result, _) = webir(temp.path(), &["validate"], ir);
    let err = result.unwrap_err();

    let report = Reporter::new(false).format_error(&err);
    assert!(report.starts_with("error: Schema validation failed\n"));
    assert!(report.contains("/Node/0/type - error WIR1004: missing required field 'type'"));
    assert!(report.ends_with("Found 1 schema violation."));
}
