use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

use webir_common::{ViolationCode, WebirError};

use super::args::CliArgs;
use super::driver::{CliIo, EXIT_FAILURE, EXIT_SUCCESS, parse_error_exit_code, run};

const DOM: &str = r#"
interface Node {
    /** The name of the node. */
    readonly nodeName: string;
}

interface Element extends Node {
    getAttribute(qualifiedName: string): string;
    onclick: ((this: Element, ev: MouseEvent) => any) | null;
}

interface Animatable {
}
"#;

const VALID_IR: &str = r#"{
  "Node": [
    { "interface": "Node", "kind": "property", "name": "nodeName", "type": "string" }
  ],
  "__extends__": {}
}"#;

const INVALID_IR: &str = r#"{
  "Node": [
    { "interface": "Node", "kind": "property", "name": "" },
    { "interface": "Node", "kind": "getter", "name": "x" }
  ]
}"#;

fn project() -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("dom.d.ts"), DOM).expect("write fixture");
    temp
}

fn invoke(cwd: &Path, argv: &[&str], stdin: &str, stdin_is_terminal: bool) -> (Result<()>, String) {
    let mut full = vec!["webir"];
    full.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full).expect("args parse");

    let mut stdout = Vec::new();
    let mut stdin = Cursor::new(stdin.as_bytes().to_vec());
    let result = {
        let mut io = CliIo {
            stdout: &mut stdout,
            stdin: &mut stdin,
            stdin_is_terminal,
        };
        run(&args, cwd, &mut io)
    };
    (result, String::from_utf8(stdout).expect("utf-8 output"))
}

fn webir_error(err: &anyhow::Error) -> &WebirError {
    err.downcast_ref::<WebirError>()
        .unwrap_or_else(|| panic!("not a WebirError: {err:#}"))
}

#[test]
fn extract_prints_ir_to_stdout() {
    let temp = project();
    let (result, stdout) = invoke(temp.path(), &["extract", "--lib", "dom.d.ts"], "", true);
    result.expect("extract");

    let value: Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    let keys: Vec<&str> = value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["Node", "Element", "__extends__"]);
    assert_eq!(value["__extends__"]["Element"][0], "Node");
    assert_eq!(value["Element"][1]["kind"], "event");
    assert_eq!(value["Node"][0]["doc"], "The name of the node.");
}

#[test]
fn extract_writes_selected_interfaces_to_a_file() {
    let temp = project();
    let (result, stdout) = invoke(
        temp.path(),
        &["extract", "Element", "--lib", "dom.d.ts", "-o", "ir.json"],
        "",
        true,
    );
    result.expect("extract");
    assert_eq!(stdout, "IR written to ir.json\n");

    let written: Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("ir.json")).expect("read"))
            .expect("JSON");
    assert!(written.get("Node").is_none());
    assert_eq!(written["Element"][0]["name"], "getAttribute");
    assert_eq!(written["__extends__"]["Element"][0], "Node");
}

#[test]
fn extract_reports_missing_declarations() {
    let temp = TempDir::new().expect("temp dir");
    let (result, stdout) = invoke(temp.path(), &["extract", "--lib", "absent.d.ts"], "", true);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("failed to load declarations"));
    assert!(stdout.is_empty());
}

#[test]
fn interfaces_lists_sorted_names() {
    let temp = project();
    let (result, stdout) = invoke(temp.path(), &["interfaces", "--lib", "dom.d.ts"], "", true);
    result.expect("interfaces");
    assert_eq!(stdout, "Element\nNode\n");
}

#[test]
fn lib_comes_from_config_file() {
    let temp = project();
    fs::write(temp.path().join("webir.json"), r#"{ "lib": "dom.d.ts" }"#).expect("config");
    let (result, stdout) = invoke(temp.path(), &["interfaces"], "", true);
    result.expect("interfaces");
    assert_eq!(stdout, "Element\nNode\n");
}

#[test]
fn validate_passes_for_a_valid_file() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("ir.json"), VALID_IR).expect("write");

    let (result, stdout) = invoke(temp.path(), &["validate", "ir.json"], "", true);
    result.expect("valid");
    assert_eq!(stdout, "Schema validation passed\n");

    let (result, _) = invoke(temp.path(), &["validate", "--in", "ir.json"], "", true);
    result.expect("valid via --in");
}

#[test]
fn validate_reads_stdin_when_piped() {
    let temp = TempDir::new().expect("temp dir");
    let (result, stdout) = invoke(temp.path(), &["validate"], VALID_IR, false);
    result.expect("valid");
    assert_eq!(stdout, "Schema validation passed\n");

    let (result, _) = invoke(temp.path(), &["validate", "-"], VALID_IR, true);
    result.expect("explicit stdin marker reads stdin even on a terminal");
}

#[test]
fn validate_fails_with_every_violation() {
    let temp = TempDir::new().expect("temp dir");
    let (result, stdout) = invoke(temp.path(), &["validate"], INVALID_IR, false);
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Schema validation failed");
    assert!(stdout.is_empty());

    let WebirError::SchemaViolations(violations) = webir_error(&err) else {
        panic!("expected schema violations, got {err:#}");
    };
    let codes: Vec<ViolationCode> = violations.iter().map(|v| v.code).collect();
    assert!(codes.contains(&ViolationCode::EmptyName));
    assert!(codes.contains(&ViolationCode::MissingField));
    assert!(codes.contains(&ViolationCode::UnknownKind));
}

#[test]
fn validate_rejects_malformed_json() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("broken.json"), "{ not json").expect("write");

    let (result, stdout) = invoke(temp.path(), &["validate", "broken.json"], "", true);
    let err = result.unwrap_err();
    match webir_error(&err) {
        WebirError::MalformedInput { origin, .. } => assert_eq!(origin, "broken.json"),
        other => panic!("expected malformed input, got {other}"),
    }
    assert!(stdout.is_empty());
}

#[test]
fn validate_without_input_on_a_terminal_is_an_error() {
    let temp = TempDir::new().expect("temp dir");
    let (result, _) = invoke(temp.path(), &["validate"], "", true);
    let err = result.unwrap_err();
    assert!(matches!(webir_error(&err), WebirError::MissingInput));
}

#[test]
fn emit_from_ir_file_writes_gleam_modules() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("ir.json"), VALID_IR).expect("write");

    let (result, stdout) = invoke(
        temp.path(),
        &["emit", "gleam", "--irFile", "ir.json", "-o", "out"],
        "",
        true,
    );
    result.expect("emit");
    assert_eq!(
        stdout,
        "Emitted: out/src/node.gleam\nEmitted: out/src/upcast.gleam\nEmitted: out/src/twig.gleam\n"
    );
    let node = fs::read_to_string(temp.path().join("out/src/node.gleam")).expect("read");
    assert!(node.contains("pub fn node_name(el: JsRef(Node)) -> String\n"));
}

#[test]
fn emit_extracts_when_no_ir_file_is_given() {
    let temp = project();
    let (result, stdout) = invoke(
        temp.path(),
        &["emit", "--lib", "dom.d.ts", "-o", "out", "--packageName", "dom"],
        "",
        true,
    );
    result.expect("emit");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Emitted: out/src/node.gleam",
            "Emitted: out/src/element.gleam",
            "Emitted: out/src/upcast.gleam",
            "Emitted: out/src/dom.gleam",
        ]
    );

    let element = fs::read_to_string(temp.path().join("out/src/element.gleam")).expect("read");
    assert!(element.contains("pub fn node_name(el: JsRef(Element)) -> String\n"));
    assert!(element.contains("/// Registers a 'click' event listener.\n"));
}

#[test]
fn emit_uses_config_out_dir() {
    let temp = project();
    fs::write(
        temp.path().join("webir.json"),
        r#"{ "lib": "dom.d.ts", "outDir": "gen" }"#,
    )
    .expect("config");
    let (result, _) = invoke(temp.path(), &["emit"], "", true);
    result.expect("emit");
    assert!(temp.path().join("gen/src/twig.gleam").is_file());
}

#[test]
fn emit_rejects_unsupported_language() {
    let temp = project();
    let (result, stdout) = invoke(
        temp.path(),
        &["emit", "rust", "--lib", "dom.d.ts", "-o", "out"],
        "",
        true,
    );
    let err = result.unwrap_err();
    match webir_error(&err) {
        WebirError::UnsupportedTarget { name } => assert_eq!(name, "rust"),
        other => panic!("expected unsupported target, got {other}"),
    }
    assert!(stdout.is_empty());
    assert!(!temp.path().join("out").exists());
}

#[test]
fn emit_refuses_invalid_ir_without_writing() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("ir.json"), INVALID_IR).expect("write");

    let (result, stdout) = invoke(
        temp.path(),
        &["emit", "gleam", "--irFile", "ir.json", "-o", "out"],
        "",
        true,
    );
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "IR is invalid, aborting emit");
    assert!(matches!(webir_error(&err), WebirError::SchemaViolations(_)));
    assert!(stdout.is_empty());
    assert!(!temp.path().join("out").exists());
}

#[test]
fn validate_ignores_a_broken_config_file() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("webir.json"), "{ \"lib\": ").expect("config");
    fs::write(temp.path().join("ir.json"), VALID_IR).expect("write");

    let (result, stdout) = invoke(temp.path(), &["validate", "ir.json"], "", true);
    result.expect("validate does not read the config");
    assert_eq!(stdout, "Schema validation passed\n");

    let (result, _) = invoke(temp.path(), &["interfaces"], "", true);
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("invalid config file"), "{err:#}");
}

#[test]
fn usage_errors_exit_with_failure_status() {
    let help = CliArgs::try_parse_from(["webir", "--help"]).unwrap_err();
    assert_eq!(parse_error_exit_code(&help), EXIT_SUCCESS);

    let version = CliArgs::try_parse_from(["webir", "--version"]).unwrap_err();
    assert_eq!(parse_error_exit_code(&version), EXIT_SUCCESS);

    let unknown = CliArgs::try_parse_from(["webir", "transmogrify"]).unwrap_err();
    assert_eq!(parse_error_exit_code(&unknown), EXIT_FAILURE);

    let missing = CliArgs::try_parse_from(["webir", "validate", "--in"]).unwrap_err();
    assert_eq!(parse_error_exit_code(&missing), EXIT_FAILURE);
}
