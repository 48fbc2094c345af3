/// Comparison module — orchestrates a run across all roots.
///
/// A run walks every root in order and resolves each distinct relative path
/// exactly once. Results are streamed as [`CompareEvent`]s over a bounded
/// crossbeam channel; [`start_compare`] runs the loop on a background
/// thread, [`compare_blocking`] runs it on the caller's.
pub mod comparator;
pub mod ledger;
pub mod progress;
pub mod walker;

pub use comparator::{Comparator, RunOutcome, PROGRESS_INTERVAL};
pub use ledger::PathLedger;
pub use progress::{CompareEvent, CompareSummary};

use crate::error::{ConfigError, EngineError};
use crate::fingerprint::DEFAULT_CHUNK_SIZE;
use crate::model::RootSet;
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::info;

/// Maximum number of events that may queue up in the channel before the
/// comparison thread waits for the consumer.
pub const EVENT_CHANNEL_CAPACITY: usize = 4_096;

/// Tunables for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Bytes read per `read` call while fingerprinting.
    pub chunk_size: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl CompareOptions {
    pub fn new(chunk_size: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(Self { chunk_size })
    }
}

/// Handle to a running or completed comparison.
pub struct CompareHandle {
    /// Receiver for every event the run produces. Disconnects once the
    /// run has finished and its terminal event has been sent.
    pub events_rx: Receiver<CompareEvent>,
    cancel_flag: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<RunOutcome>>,
}

impl CompareHandle {
    /// Request the run to stop before its next path.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Wait for the comparison thread to exit.
    ///
    /// Returns `None` if the thread panicked.
    pub fn join(mut self) -> Option<RunOutcome> {
        self.thread.take().and_then(|t| t.join().ok())
    }
}

/// Start a comparison on a background thread.
pub fn start_compare(roots: RootSet, options: CompareOptions) -> Result<CompareHandle, EngineError> {
    let (events_tx, events_rx) = crossbeam_channel::bounded::<CompareEvent>(EVENT_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let comparator = Comparator::new(roots, options)?;

    let thread = thread::Builder::new()
        .name("watches-compare".into())
        .spawn(move || {
            info!(
                "Starting comparison of {} roots",
                comparator.roots().len()
            );
            comparator.run(&events_tx, &cancel_clone)
        })
        .map_err(EngineError::Spawn)?;

    Ok(CompareHandle {
        events_rx,
        cancel_flag,
        thread: Some(thread),
    })
}

/// Run a comparison to completion on the calling thread.
///
/// `events` should be unbounded or drained concurrently, otherwise the run
/// blocks once the channel fills.
pub fn compare_blocking(
    roots: RootSet,
    options: CompareOptions,
    events: &Sender<CompareEvent>,
) -> Result<RunOutcome, EngineError> {
    let comparator = Comparator::new(roots, options)?;
    Ok(comparator.run(events, &AtomicBool::new(false)))
}
