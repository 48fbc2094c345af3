/// watches core — n-way file tree comparison engine.
///
/// This crate contains all comparison logic with no CLI or terminal
/// dependencies. Frontends feed it a validated [`model::RootSet`] and render
/// the [`compare::CompareEvent`]s it produces.
///
/// # Modules
///
/// - [`model`] — Roots, fingerprints and per-path grouping reports.
/// - [`fingerprint`] — Chunked SHA-256 of a single file.
/// - [`compare`] — Traversal, exactly-once path claims, per-path fan-out/fan-in.
/// - [`error`] — Configuration and per-file access errors.
pub mod compare;
pub mod error;
pub mod fingerprint;
pub mod model;

pub use compare::{
    compare_blocking, start_compare, CompareEvent, CompareHandle, CompareOptions, CompareSummary,
    Comparator, RunOutcome,
};
pub use error::{ConfigError, EngineError, FileAccessError};
pub use fingerprint::{Fingerprinter, DEFAULT_CHUNK_SIZE};
pub use model::{Fingerprint, FingerprintGroup, GroupingReport, RootSet};
