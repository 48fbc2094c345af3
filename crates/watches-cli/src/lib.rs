/// watches CLI — argument parsing, run orchestration and report sinks.
///
/// All comparison logic lives in `watches-core`; this crate turns command
/// line input into a validated root set and renders the resulting events.
pub mod cli;
pub mod run;
pub mod sink;

pub use cli::{Cli, ReportFormat};
pub use run::{failure_status, run, RunReport};
