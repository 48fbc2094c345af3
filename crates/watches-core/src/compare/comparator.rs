//! The comparison loop: walk each root, claim each relative path once, fan
//! out one fingerprint task per root, wait for all of them, group, report.
//!
//! # Fan-out / fan-in
//!
//! Each claimed path spawns exactly one task per root onto a dedicated
//! rayon pool sized to the root count. `ThreadPool::scope` does not return
//! until every task has finished, which is the per-path barrier: no report
//! is built from a partial set of results and no task outlives its path.
//! Results travel back over a crossbeam channel bounded to the root count,
//! so a worker never blocks on `send`.
//!
//! Paths are resolved one at a time in walk order, root after root, so
//! steady-state concurrency is the number of roots, not the number of files.
use crate::compare::ledger::PathLedger;
use crate::compare::progress::{CompareEvent, CompareSummary};
use crate::compare::walker::{walk_root, WalkItem};
use crate::compare::CompareOptions;
use crate::error::EngineError;
use crate::fingerprint::Fingerprinter;
use crate::model::{group_results, FingerprintResult, GroupingReport, RootSet};
use crossbeam_channel::Sender;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Send a `Progress` event every this many checked paths.
pub const PROGRESS_INTERVAL: u64 = 1_000;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(CompareSummary),
    /// Cancelled by the caller, or the event receiver went away.
    Cancelled,
}

/// Drives a comparison over a fixed [`RootSet`].
pub struct Comparator {
    roots: RootSet,
    fingerprinter: Fingerprinter,
    pool: rayon::ThreadPool,
    ledger: PathLedger,
}

impl Comparator {
    pub fn new(roots: RootSet, options: CompareOptions) -> Result<Self, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(roots.len())
            .thread_name(|i| format!("watches-fingerprint-{i}"))
            .build()?;

        Ok(Self {
            roots,
            fingerprinter: Fingerprinter::new(options.chunk_size),
            pool,
            ledger: PathLedger::new(),
        })
    }

    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// Fingerprint `relative` under every root and group the results.
    ///
    /// Blocks until every per-root task has returned or failed. Does not
    /// consult or update the processed-paths ledger.
    pub fn check_path(&self, relative: &Path) -> GroupingReport {
        let (tx, rx) = crossbeam_channel::bounded::<FingerprintResult>(self.roots.len());
        let fingerprinter = &self.fingerprinter;

        self.pool.scope(|s| {
            for (index, root) in self.roots.iter() {
                let tx = tx.clone();
                s.spawn(move |_| {
                    let outcome = fingerprinter.fingerprint(root, relative);
                    // The receiver outlives the scope, so this cannot fail.
                    let _ = tx.send(FingerprintResult {
                        root: index,
                        outcome,
                    });
                });
            }
        });
        drop(tx);

        let results: Vec<FingerprintResult> = rx.try_iter().collect();
        debug_assert_eq!(results.len(), self.roots.len(), "fan-in lost a result");
        debug!(
            "Fan-in for {}: {} results",
            relative.display(),
            results.len()
        );

        group_results(relative.to_path_buf(), &self.roots, results)
    }

    /// Walk every root in order, reporting through `events`.
    ///
    /// `cancel` is checked between paths. If the receiving end of `events`
    /// is dropped the run stops as if cancelled.
    pub fn run(&self, events: &Sender<CompareEvent>, cancel: &AtomicBool) -> RunOutcome {
        let start = Instant::now();
        let mut summary = CompareSummary::new(self.roots.len());

        for (index, root) in self.roots.iter() {
            info!(
                "Walking root {}/{}: {}",
                index.idx() + 1,
                self.roots.len(),
                root.display()
            );
            if events
                .send(CompareEvent::RootStarted {
                    index: index.idx(),
                    root: root.to_path_buf(),
                })
                .is_err()
            {
                return self.receiver_gone();
            }

            for item in walk_root(root) {
                if cancel.load(Ordering::Relaxed) {
                    info!("Comparison cancelled after {} paths", summary.paths_checked);
                    let _ = events.send(CompareEvent::Cancelled);
                    return RunOutcome::Cancelled;
                }

                let relative = match item {
                    WalkItem::File(relative) => relative,
                    WalkItem::Error { path, message } => {
                        summary.walk_errors += 1;
                        debug!("Walk error under {}: {message}", root.display());
                        let event = CompareEvent::WalkError {
                            root: root.to_path_buf(),
                            path,
                            message,
                        };
                        if events.send(event).is_err() {
                            return self.receiver_gone();
                        }
                        continue;
                    }
                };

                // Claim before dispatch; a later root's walk finding the same
                // relative path must not check it again.
                if !self.ledger.claim(&relative) {
                    summary.duplicates_skipped += 1;
                    continue;
                }

                let report = self.check_path(&relative);
                if !self.publish(report, &mut summary, events) {
                    return self.receiver_gone();
                }

                if summary.paths_checked.is_multiple_of(PROGRESS_INTERVAL) {
                    let _ = events.send(CompareEvent::Progress {
                        paths_checked: summary.paths_checked,
                        mismatches: summary.mismatches,
                        current_path: relative,
                    });
                }
            }
        }

        summary.finish(start.elapsed());
        info!(
            "Comparison complete: {} paths, {} mismatches, {} unreadable in {:?}",
            summary.paths_checked, summary.mismatches, summary.unreadable, summary.duration
        );
        let _ = events.send(CompareEvent::Complete(summary.clone()));
        RunOutcome::Completed(summary)
    }

    /// Update totals and emit the events for one finished path.
    ///
    /// Returns `false` if the receiver has been dropped.
    fn publish(
        &self,
        report: GroupingReport,
        summary: &mut CompareSummary,
        events: &Sender<CompareEvent>,
    ) -> bool {
        summary.paths_checked += 1;
        summary.bytes_hashed += report.bytes_hashed;

        for failure in &report.failures {
            summary.unreadable += 1;
            debug!(
                "Unable to hash {}: {}",
                failure.root.join(&report.path).display(),
                failure.cause
            );
            let event = CompareEvent::Unreadable {
                root: failure.root.clone(),
                path: report.path.clone(),
                cause: failure.cause.clone(),
                missing: failure.missing,
            };
            if events.send(event).is_err() {
                return false;
            }
        }

        if report.is_unresolved() {
            summary.unresolved += 1;
            let event = CompareEvent::Unresolved {
                path: report.path,
                failures: report.failures.len(),
            };
            return events.send(event).is_ok();
        }

        if report.is_mismatch() {
            summary.mismatches += 1;
            debug!(
                "Mismatch {}: {} distinct fingerprints",
                report.path.display(),
                report.groups.len()
            );
            return events.send(CompareEvent::Mismatch(report)).is_ok();
        }

        true
    }

    fn receiver_gone(&self) -> RunOutcome {
        debug!("Event receiver dropped; stopping comparison");
        RunOutcome::Cancelled
    }
}
