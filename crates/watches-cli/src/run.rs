//! Run orchestration: validate input, start the engine, pump events into the
//! sink, decide the exit status.
use crate::cli::Cli;
use crate::sink::build_sink;
use anyhow::Context;
use std::io::Write;
use std::process::ExitCode;
use tracing::{info, warn};
use watches_core::{start_compare, CompareEvent, CompareOptions, CompareSummary, ConfigError, RootSet};

/// Exit status for a completed run with no reason to fail.
pub const EXIT_OK: u8 = 0;
/// Mismatches were found and `--fail-on-mismatch` was given.
pub const EXIT_MISMATCH: u8 = 1;
/// Invalid roots or options; nothing was compared.
pub const EXIT_CONFIG: u8 = 2;
/// The run could not be carried out (output closed, thread failure).
pub const EXIT_FAILURE: u8 = 3;

/// What a finished invocation produced.
#[derive(Debug)]
pub struct RunReport {
    /// `None` if the run was cancelled before completing.
    pub summary: Option<CompareSummary>,
    pub fail_on_mismatch: bool,
}

impl RunReport {
    pub fn status_code(&self) -> u8 {
        match &self.summary {
            Some(summary) if self.fail_on_mismatch && summary.has_mismatches() => EXIT_MISMATCH,
            Some(_) => EXIT_OK,
            None => EXIT_FAILURE,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status_code())
    }
}

/// Map a failed run to its exit status.
pub fn failure_status(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        EXIT_CONFIG
    } else {
        EXIT_FAILURE
    }
}

/// Compare the roots named in `cli`, rendering findings to `out`.
///
/// Configuration problems are returned before any traversal starts and
/// keep their [`ConfigError`] type inside the `anyhow::Error`.
pub fn run<W: Write>(cli: &Cli, out: W) -> anyhow::Result<RunReport> {
    let roots = RootSet::new(cli.search.iter().cloned())?;
    let options = CompareOptions::new(cli.chunk_size)?;

    info!(
        "Comparing {} roots: {}",
        roots.len(),
        roots
            .paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut sink = build_sink(cli.format, out);
    let handle = start_compare(roots, options).context("failed to start comparison")?;

    let mut summary = None;
    for event in handle.events_rx.iter() {
        sink.event(&event)?;
        match event {
            CompareEvent::Complete(s) => summary = Some(s),
            CompareEvent::Cancelled => warn!("Comparison was cancelled before completing"),
            _ => {}
        }
    }
    sink.finish()?;

    if handle.join().is_none() {
        anyhow::bail!("comparison thread panicked");
    }

    Ok(RunReport {
        summary,
        fail_on_mismatch: cli.fail_on_mismatch,
    })
}
