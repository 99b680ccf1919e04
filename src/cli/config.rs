use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use webir_decl::DEFAULT_LIB_PATH;
use webir_emitter::DEFAULT_PACKAGE_NAME;

use crate::cli::args::CliArgs;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "webir.json";
pub const DEFAULT_OUT_DIR: &str = "bindings/gleam/twig";
pub const DEFAULT_TARGET: &str = "gleam";

/// Contents of `webir.json`. Comments and trailing commas are accepted.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WebirConfig {
    #[serde(default)]
    pub lib: Option<String>,
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
}

/// Settings after applying CLI flags, then the config file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub lib: PathBuf,
    pub out_dir: PathBuf,
    pub target: String,
    pub package_name: String,
    /// Config file the settings were read from, if any.
    pub source: Option<PathBuf>,
}

pub fn parse_config(source: &str) -> Result<WebirConfig> {
    let config =
        serde_json::from_str(&jsonc_to_json(source)).context("failed to parse webir config JSON")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<WebirConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config file {}", path.display()))
}

/// Resolve settings for one invocation.
///
/// Paths from the command line are relative to `cwd`; paths from the config
/// file are relative to the file's directory.
pub fn resolve_config(args: &CliArgs, cwd: &Path) -> Result<ResolvedConfig> {
    let config_path = match &args.config {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            Some(path)
        }
        None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|path| path.is_file()),
    };

    let (config, base) = match &config_path {
        Some(path) => {
            let config = load_config(path)?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
            tracing::debug!(config = %path.display(), "loaded config file");
            (config, base)
        }
        None => (WebirConfig::default(), cwd.to_path_buf()),
    };

    let lib = match (&args.lib, &config.lib) {
        (Some(lib), _) => cwd.join(lib),
        (None, Some(lib)) => base.join(lib),
        (None, None) => cwd.join(DEFAULT_LIB_PATH),
    };
    let out_dir = match &config.out_dir {
        Some(dir) => base.join(dir),
        None => cwd.join(DEFAULT_OUT_DIR),
    };

    Ok(ResolvedConfig {
        lib,
        out_dir,
        target: config.target.unwrap_or_else(|| DEFAULT_TARGET.to_string()),
        package_name: config
            .package_name
            .unwrap_or_else(|| DEFAULT_PACKAGE_NAME.to_string()),
        source: config_path,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Str,
    StrEscape,
    LineComment,
    BlockComment,
}

/// Rewrite JSONC as plain JSON in one pass.
///
/// Comments are dropped except for their newlines, so serde_json still
/// reports the original line numbers. A comma whose next significant
/// character closes an object or array is blanked out.
fn jsonc_to_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_comma: Option<usize> = None;
    let mut chars = input.chars().peekable();
    let mut state = Scan::Code;

    while let Some(ch) = chars.next() {
        state = match (state, ch) {
            (Scan::Str, '\\') => {
                out.push(ch);
                Scan::StrEscape
            }
            (Scan::Str, '"') => {
                out.push(ch);
                Scan::Code
            }
            (Scan::Str | Scan::StrEscape, _) => {
                out.push(ch);
                Scan::Str
            }
            (Scan::LineComment, '\n') => {
                out.push(ch);
                Scan::Code
            }
            (Scan::BlockComment, '*') if chars.peek() == Some(&'/') => {
                chars.next();
                Scan::Code
            }
            (Scan::LineComment | Scan::BlockComment, _) => {
                if ch == '\n' {
                    out.push(ch);
                }
                state
            }
            (Scan::Code, '/') if matches!(chars.peek(), Some('/' | '*')) => {
                match chars.next() {
                    Some('/') => Scan::LineComment,
                    _ => Scan::BlockComment,
                }
            }
            (Scan::Code, '}' | ']') => {
                if let Some(at) = pending_comma.take() {
                    out.replace_range(at..at + 1, " ");
                }
                out.push(ch);
                Scan::Code
            }
            (Scan::Code, ',') => {
                pending_comma = Some(out.len());
                out.push(ch);
                Scan::Code
            }
            (Scan::Code, _) => {
                if !ch.is_whitespace() {
                    pending_comma = None;
                }
                out.push(ch);
                if ch == '"' { Scan::Str } else { Scan::Code }
            }
        };
    }

    out
}
