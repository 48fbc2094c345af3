/// Data model for a comparison run.
///
/// Re-exports the root set and the per-path report types.
pub mod report;
pub mod root;

pub use report::{
    group_results, FileDigest, Fingerprint, FingerprintGroup, FingerprintResult,
    GroupingReport, RootFailure,
};
pub use root::{RootIndex, RootSet};
