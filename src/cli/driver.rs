use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

use webir_common::{IrDocument, WebirError};
use webir_decl::{DtsSource, Extraction, extract};
use webir_emitter::{BindingTarget, EmitOptions, GleamEmitter, write_files};
use webir_schema::SchemaValidator;

use crate::cli::args::{CliArgs, Command, EmitArgs, ExtractArgs, ValidateArgs};
use crate::cli::config::{ResolvedConfig, resolve_config};

/// Process exit status codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Marker used on the command line for "read standard input".
const STDIN_MARKER: &str = "-";

/// Standard streams for one invocation, so tests can substitute buffers.
pub struct CliIo<'a> {
    pub stdout: &'a mut dyn Write,
    pub stdin: &'a mut dyn Read,
    pub stdin_is_terminal: bool,
}

/// Run one command. Progress lines go to `io.stdout`; failures are returned.
///
/// The config file is only read by commands that use it, so `validate`
/// works next to a broken `webir.json`.
pub fn run(args: &CliArgs, cwd: &Path, io: &mut CliIo<'_>) -> Result<()> {
    match &args.command {
        Command::Extract(extract_args) => {
            run_extract(extract_args, &resolve_config(args, cwd)?, cwd, io)
        }
        Command::Interfaces => run_interfaces(&resolve_config(args, cwd)?, io),
        Command::Validate(validate_args) => run_validate(validate_args, cwd, io),
        Command::Emit(emit_args) => run_emit(emit_args, &resolve_config(args, cwd)?, cwd, io),
    }
}

/// Exit status for a command line clap rejected. Help and version requests
/// succeed; every other parse error is an ordinary failure.
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => EXIT_SUCCESS,
        _ => EXIT_FAILURE,
    }
}

fn run_extract(
    args: &ExtractArgs,
    config: &ResolvedConfig,
    cwd: &Path,
    io: &mut CliIo<'_>,
) -> Result<()> {
    let extraction = extract_from_lib(&config.lib)?.restrict(&args.interfaces);
    let json = extraction
        .into_document()
        .to_pretty_json()
        .context("failed to serialize IR")?;

    match &args.output {
        Some(output) => {
            let path = cwd.join(output);
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write IR to {}", path.display()))?;
            writeln!(io.stdout, "IR written to {}", output.display())?;
        }
        None => writeln!(io.stdout, "{json}")?,
    }
    Ok(())
}

fn run_interfaces(config: &ResolvedConfig, io: &mut CliIo<'_>) -> Result<()> {
    let extraction = extract_from_lib(&config.lib)?;
    for name in extraction.sorted_interface_names() {
        writeln!(io.stdout, "{name}")?;
    }
    Ok(())
}

fn run_validate(args: &ValidateArgs, cwd: &Path, io: &mut CliIo<'_>) -> Result<()> {
    let file = args.input.as_ref().or(args.file.as_ref());
    let (origin, text) = read_ir_input(file, cwd, io)?;
    let value = parse_ir_json(&origin, &text)?;

    let report = SchemaValidator::new().validate(&value);
    if let Err(violations) = report.into_result() {
        return Err(WebirError::SchemaViolations(violations)).context("Schema validation failed");
    }
    writeln!(io.stdout, "Schema validation passed")?;
    Ok(())
}

fn run_emit(args: &EmitArgs, config: &ResolvedConfig, cwd: &Path, io: &mut CliIo<'_>) -> Result<()> {
    let language = args.language.as_deref().unwrap_or(&config.target);
    let target = BindingTarget::parse(language)?;

    let document = match &args.ir_file {
        Some(ir_file) => {
            let path = cwd.join(ir_file);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read IR file {}", path.display()))?;
            let origin = ir_file.display().to_string();
            let value = parse_ir_json(&origin, &text)?;
            validate_for_emit(&value)?;
            IrDocument::from_value(value)
                .map_err(|source| WebirError::MalformedInput { origin, source })?
        }
        None => {
            let document = extract_from_lib(&config.lib)?.into_document();
            let value = serde_json::to_value(&document).context("failed to serialize IR")?;
            validate_for_emit(&value)?;
            document
        }
    };

    let out_dir = match &args.output {
        Some(output) => cwd.join(output),
        None => config.out_dir.clone(),
    };
    let package_name = args
        .package_name
        .clone()
        .unwrap_or_else(|| config.package_name.clone());

    let _span = info_span!("emit", %target, out_dir = %out_dir.display()).entered();
    let files = match target {
        BindingTarget::Gleam => GleamEmitter::new(EmitOptions { package_name }).emit(&document)?,
    };
    let written = write_files(&out_dir, &files)?;
    for path in &written {
        writeln!(io.stdout, "Emitted: {}", display_relative(path, cwd).display())?;
    }
    Ok(())
}

fn validate_for_emit(value: &Value) -> Result<()> {
    let report = SchemaValidator::new().validate(value);
    report
        .into_result()
        .map_err(WebirError::SchemaViolations)
        .context("IR is invalid, aborting emit")
}

fn extract_from_lib(lib: &Path) -> Result<Extraction> {
    let source = DtsSource::from_path(lib)
        .with_context(|| format!("failed to load declarations from {}", lib.display()))?;
    let extraction = extract(&source)
        .with_context(|| format!("failed to parse declarations in {}", source.name()))?;
    debug!(
        interfaces = extraction.interface_names.len(),
        edges = extraction.extends.len(),
        "extracted IR"
    );
    Ok(extraction)
}

/// Read IR text from a file, or from stdin for `-` and no file at all.
fn read_ir_input(file: Option<&PathBuf>, cwd: &Path, io: &mut CliIo<'_>) -> Result<(String, String)> {
    match file {
        Some(path) if path.as_os_str() != STDIN_MARKER => {
            let full = cwd.join(path);
            let text = std::fs::read_to_string(&full)
                .with_context(|| format!("failed to read IR file {}", full.display()))?;
            Ok((path.display().to_string(), text))
        }
        explicit => {
            if explicit.is_none() && io.stdin_is_terminal {
                return Err(WebirError::MissingInput.into());
            }
            let mut text = String::new();
            io.stdin
                .read_to_string(&mut text)
                .context("failed to read IR from stdin")?;
            Ok(("<stdin>".to_string(), text))
        }
    }
}

fn parse_ir_json(origin: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|source| {
        WebirError::MalformedInput {
            origin: origin.to_string(),
            source,
        }
        .into()
    })
}

fn display_relative(path: &Path, cwd: &Path) -> PathBuf {
    path.strip_prefix(cwd)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
