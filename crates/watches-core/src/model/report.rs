//! Per-path results: fingerprints, failures and the grouping built from them.
use crate::error::FileAccessError;
use crate::model::{RootIndex, RootSet};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Lowercase hex SHA-256 of a file's full content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-rendered hex digest.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fingerprint plus the number of bytes that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDigest {
    pub fingerprint: Fingerprint,
    pub bytes_read: u64,
}

/// Outcome of one fingerprint task for one (root, relative path) pair.
#[derive(Debug)]
pub struct FingerprintResult {
    pub root: RootIndex,
    pub outcome: Result<FileDigest, FileAccessError>,
}

/// Roots whose copy of a path hashed to the same fingerprint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FingerprintGroup {
    pub fingerprint: Fingerprint,
    pub roots: Vec<PathBuf>,
}

/// A root that did not contribute a fingerprint for a path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RootFailure {
    pub root: PathBuf,
    pub cause: String,
    /// The file is absent under this root (as opposed to unreadable).
    pub missing: bool,
}

/// Everything known about one relative path after its fan-in completes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupingReport {
    pub path: PathBuf,
    pub groups: Vec<FingerprintGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RootFailure>,
    #[serde(skip)]
    pub bytes_hashed: u64,
}

impl GroupingReport {
    /// More than one distinct fingerprint among the roots that could be read.
    pub fn is_mismatch(&self) -> bool {
        self.groups.len() > 1
    }

    /// No root produced a fingerprint at all.
    pub fn is_unresolved(&self) -> bool {
        self.groups.is_empty()
    }

    /// The group a given root landed in, if it produced a fingerprint.
    pub fn group_of(&self, root: &std::path::Path) -> Option<&FingerprintGroup> {
        self.groups.iter().find(|g| g.roots.iter().any(|r| r == root))
    }
}

/// Fold the fan-in results for `path` into a [`GroupingReport`].
///
/// Results may arrive in any order; they are sorted by root index first so
/// groups come out ordered by their lowest root and each group lists its
/// roots in root-set order.
pub fn group_results(
    path: PathBuf,
    roots: &RootSet,
    mut results: Vec<FingerprintResult>,
) -> GroupingReport {
    results.sort_by_key(|r| r.root);

    let mut groups: Vec<FingerprintGroup> = Vec::new();
    let mut failures = Vec::new();
    let mut bytes_hashed = 0u64;

    for result in results {
        let root = roots.get(result.root).to_path_buf();
        match result.outcome {
            Ok(digest) => {
                bytes_hashed += digest.bytes_read;
                match groups.iter_mut().find(|g| g.fingerprint == digest.fingerprint) {
                    Some(group) => group.roots.push(root),
                    None => groups.push(FingerprintGroup {
                        fingerprint: digest.fingerprint,
                        roots: vec![root],
                    }),
                }
            }
            Err(err) => failures.push(RootFailure {
                root,
                missing: err.is_not_found(),
                cause: err.to_string(),
            }),
        }
    }

    GroupingReport {
        path,
        groups,
        failures,
        bytes_hashed,
    }
}
