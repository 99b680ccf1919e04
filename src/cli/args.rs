use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the webir binary.
#[derive(Parser, Debug)]
#[command(
    name = "webir",
    version,
    about = "Extract DOM interface IR from TypeScript declarations and emit Gleam bindings"
)]
pub struct CliArgs {
    /// TypeScript declaration file to read interfaces from
    /// [default: node_modules/typescript/lib/lib.dom.d.ts].
    #[arg(long, global = true, value_name = "PATH")]
    pub lib: Option<PathBuf>,

    /// Configuration file [default: webir.json when present].
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract the DOM API IR as JSON.
    Extract(ExtractArgs),
    /// List every interface with at least one member.
    Interfaces,
    /// Validate an IR JSON document against the IR schema.
    Validate(ValidateArgs),
    /// Emit bindings for a target language.
    Emit(EmitArgs),
}

#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// Interfaces to extract (default: all).
    #[arg(value_name = "INTERFACE")]
    pub interfaces: Vec<String>,

    /// File path to write the IR to instead of stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// IR file to validate; `-` or nothing reads stdin.
    #[arg(value_name = "FILE", conflicts_with = "input")]
    pub file: Option<PathBuf>,

    /// IR file to validate.
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct EmitArgs {
    /// Binding language to emit (only `gleam` is supported).
    #[arg(value_name = "LANGUAGE")]
    pub language: Option<String>,

    /// Load the IR from this file instead of extracting it.
    #[arg(long = "irFile", alias = "ir-file", value_name = "PATH")]
    pub ir_file: Option<PathBuf>,

    /// Output directory [default: bindings/gleam/twig].
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Name of the aggregator module [default: twig].
    #[arg(long = "packageName", alias = "package-name", value_name = "NAME")]
    pub package_name: Option<String>,
}
