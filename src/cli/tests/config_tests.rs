use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use super::args::CliArgs;
use super::config::{
    DEFAULT_OUT_DIR, WebirConfig, load_config, parse_config, resolve_config,
};

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["webir"];
    full.extend_from_slice(argv);
    CliArgs::try_parse_from(full).expect("args")
}

#[test]
fn parses_jsonc_with_comments_and_trailing_commas() {
    let input = r#"
    {
        // where lib.dom.d.ts lives
        "lib": "vendor/lib.dom.d.ts", /* relative to this file */
        "outDir": "out//gleam",
        "packageName": "dom",
    }
    "#;
    let config = parse_config(input).expect("config");
    assert_eq!(
        config,
        WebirConfig {
            lib: Some("vendor/lib.dom.d.ts".to_string()),
            out_dir: Some("out//gleam".to_string()),
            target: None,
            package_name: Some("dom".to_string()),
        }
    );
}

#[test]
fn comment_and_comma_markers_inside_strings_are_kept() {
    let config = parse_config(r#"{ "lib": "a,}/*b*/.d.ts", "outDir": "\"//out", }"#).expect("config");
    assert_eq!(config.lib.as_deref(), Some("a,}/*b*/.d.ts"));
    assert_eq!(config.out_dir.as_deref(), Some("\"//out"));
}

#[test]
fn parse_errors_keep_line_numbers_past_comments() {
    let err = parse_config("{\n  /* one\n  two */\n  \"lib\": 3\n}").unwrap_err();
    assert!(format!("{err:#}").contains("line 4"), "{err:#}");
}

#[test]
fn rejects_unknown_fields() {
    assert!(parse_config(r#"{ "outdir": "x" }"#).is_err());
}

#[test]
fn load_config_reports_missing_file() {
    let err = load_config(Path::new("/definitely/not/here/webir.json")).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read config file"));
}

#[test]
fn defaults_without_config_file() {
    let temp = TempDir::new().expect("temp dir");
    let resolved = resolve_config(&args(&["interfaces"]), temp.path()).expect("resolve");
    assert_eq!(
        resolved.lib,
        temp.path().join("node_modules/typescript/lib/lib.dom.d.ts")
    );
    assert_eq!(resolved.out_dir, temp.path().join(DEFAULT_OUT_DIR));
    assert_eq!(resolved.target, "gleam");
    assert_eq!(resolved.package_name, "twig");
    assert_eq!(resolved.source, None);
}

#[test]
fn discovers_default_config_and_resolves_relative_to_it() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(
        temp.path().join("webir.json"),
        r#"{ "lib": "types/dom.d.ts", "outDir": "gen", "packageName": "dom" }"#,
    )
    .expect("write config");

    let resolved = resolve_config(&args(&["interfaces"]), temp.path()).expect("resolve");
    assert_eq!(resolved.lib, temp.path().join("types/dom.d.ts"));
    assert_eq!(resolved.out_dir, temp.path().join("gen"));
    assert_eq!(resolved.package_name, "dom");
    assert_eq!(resolved.source, Some(temp.path().join("webir.json")));
}

#[test]
fn explicit_config_paths_are_relative_to_the_config_directory() {
    let temp = TempDir::new().expect("temp dir");
    let nested = temp.path().join("conf");
    fs::create_dir_all(&nested).expect("mkdir");
    fs::write(nested.join("custom.json"), r#"{ "lib": "dom.d.ts" }"#).expect("write config");

    let resolved = resolve_config(
        &args(&["interfaces", "--config", "conf/custom.json"]),
        temp.path(),
    )
    .expect("resolve");
    assert_eq!(resolved.lib, nested.join("dom.d.ts"));
}

#[test]
fn command_line_lib_wins_over_config() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("webir.json"), r#"{ "lib": "from-config.d.ts" }"#)
        .expect("write config");

    let resolved = resolve_config(&args(&["interfaces", "--lib", "flag.d.ts"]), temp.path())
        .expect("resolve");
    assert_eq!(resolved.lib, temp.path().join("flag.d.ts"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = TempDir::new().expect("temp dir");
    let err = resolve_config(&args(&["interfaces", "--config", "nope.json"]), temp.path())
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}
