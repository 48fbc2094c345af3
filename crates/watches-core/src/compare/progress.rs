//! Events sent from the comparison thread to whatever renders results.
//!
//! Every report a run produces travels through one of these messages; the
//! engine itself never writes to stdout.
use crate::model::GroupingReport;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Messages emitted by a running comparison.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CompareEvent {
    /// The walk of a root is starting.
    RootStarted { index: usize, root: PathBuf },
    /// Periodic update with running totals.
    Progress {
        paths_checked: u64,
        mismatches: u64,
        current_path: PathBuf,
    },
    /// A file could not be fingerprinted under one root. That root is left
    /// out of the path's grouping.
    Unreadable {
        root: PathBuf,
        path: PathBuf,
        cause: String,
        missing: bool,
    },
    /// A directory entry could not be read during traversal.
    WalkError {
        root: PathBuf,
        path: Option<PathBuf>,
        message: String,
    },
    /// Roots disagree on the content of a path.
    Mismatch(GroupingReport),
    /// No root produced a fingerprint for a path it was discovered under.
    Unresolved { path: PathBuf, failures: usize },
    /// All roots walked; final totals.
    Complete(CompareSummary),
    /// The run stopped early because cancellation was requested.
    Cancelled,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct CompareSummary {
    pub roots: usize,
    /// Distinct relative paths fingerprinted.
    pub paths_checked: u64,
    /// Walk hits skipped because an earlier root already claimed the path.
    pub duplicates_skipped: u64,
    pub mismatches: u64,
    /// (root, path) pairs that could not be fingerprinted.
    pub unreadable: u64,
    pub unresolved: u64,
    pub walk_errors: u64,
    pub bytes_hashed: u64,
    pub started_at: DateTime<Local>,
    pub elapsed_ms: u64,
    #[serde(skip)]
    pub duration: Duration,
}

impl CompareSummary {
    pub(crate) fn new(roots: usize) -> Self {
        Self {
            roots,
            paths_checked: 0,
            duplicates_skipped: 0,
            mismatches: 0,
            unreadable: 0,
            unresolved: 0,
            walk_errors: 0,
            bytes_hashed: 0,
            started_at: Local::now(),
            elapsed_ms: 0,
            duration: Duration::ZERO,
        }
    }

    pub(crate) fn finish(&mut self, duration: Duration) {
        self.duration = duration;
        self.elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    }

    pub fn has_mismatches(&self) -> bool {
        self.mismatches > 0
    }
}
