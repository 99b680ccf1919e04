#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use webir::cli::args::CliArgs;
use webir::cli::driver::{self, CliIo, EXIT_FAILURE, EXIT_SUCCESS};
use webir::cli::reporter::Reporter;

fn main() -> Result<()> {
    // No-op unless WEBIR_LOG or RUST_LOG is set; see src/tracing_config.rs.
    webir::tracing_config::init_tracing();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version text goes to stdout, usage errors to stderr.
            err.print().context("failed to print usage")?;
            std::process::exit(driver::parse_error_exit_code(&err));
        }
    };
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let stdin = std::io::stdin();
    let stdin_is_terminal = stdin.is_terminal();
    let mut stdin = stdin.lock();
    let mut stdout = std::io::stdout().lock();
    let mut io = CliIo {
        stdout: &mut stdout,
        stdin: &mut stdin,
        stdin_is_terminal,
    };

    let status = match driver::run(&args, &cwd, &mut io) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            let reporter = Reporter::new(std::io::stderr().is_terminal());
            eprintln!("{}", reporter.format_error(&err));
            EXIT_FAILURE
        }
    };

    stdout.flush().context("failed to flush stdout")?;
    std::process::exit(status);
}
