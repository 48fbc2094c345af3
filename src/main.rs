//! watches — n-way file tree differencer.
//!
//! Thin binary entry point. All logic lives in the `watches-core` and
//! `watches-cli` crates.

use clap::Parser;
use std::process::ExitCode;
use watches_cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("watches {} starting", env!("CARGO_PKG_VERSION"));

    match watches_cli::run(&cli, std::io::stdout().lock()) {
        Ok(report) => report.exit_code(),
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(watches_cli::failure_status(&err))
        }
    }
}
