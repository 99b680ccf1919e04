//! Diagnostic logging for the `webir` binary.
//!
//! Logging is off unless `WEBIR_LOG` (or `RUST_LOG`) is set. A bare level
//! such as `WEBIR_LOG=debug` is scoped to the webir crates so schema
//! compilation internals stay quiet; full directives are passed through.
//! `WEBIR_LOG_FORMAT` picks the layout:
//!
//! ```bash
//! WEBIR_LOG=debug WEBIR_LOG_FORMAT=tree webir emit gleam
//! WEBIR_LOG="webir_emitter::inheritance=trace" webir emit gleam --irFile ir.json
//! WEBIR_LOG=trace WEBIR_LOG_FORMAT=json webir validate ir.json 2> trace.ndjson
//! ```
//!
//! Everything is written to stderr; stdout carries IR and progress lines.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_ENV: &str = "WEBIR_LOG";
const FALLBACK_LOG_ENV: &str = "RUST_LOG";
const LOG_FORMAT_ENV: &str = "WEBIR_LOG_FORMAT";

/// Crates whose events a bare level enables.
const WEBIR_TARGETS: &[&str] = &[
    "webir",
    "webir_common",
    "webir_decl",
    "webir_schema",
    "webir_emitter",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// Indented spans via `tracing-tree`, one level per interface.
    Tree,
    Json,
}

impl LogFormat {
    /// Unknown names fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Logging settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogSettings {
    /// Filter directives, `None` when logging is off.
    pub directives: Option<String>,
    pub format: LogFormat,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `WEBIR_LOG` wins over `RUST_LOG`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        LogSettings {
            directives: set(LOG_ENV)
                .or_else(|| set(FALLBACK_LOG_ENV))
                .map(|value| scope_directives(&value)),
            format: set(LOG_FORMAT_ENV).map_or_else(LogFormat::default, |value| LogFormat::parse(&value)),
        }
    }
}

/// Expand a bare level (`debug`) into one directive per webir crate.
pub fn scope_directives(value: &str) -> String {
    let value = value.trim();
    if value.contains(['=', ',']) {
        return value.to_string();
    }
    WEBIR_TARGETS
        .iter()
        .map(|target| format!("{target}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber described by the environment, if any.
pub fn init_tracing() {
    let settings = LogSettings::from_env();
    let Some(directives) = settings.directives else {
        return;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    match settings.format {
        LogFormat::Tree => {
            let layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(layer).init();
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).init();
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).init();
        }
    }
}
