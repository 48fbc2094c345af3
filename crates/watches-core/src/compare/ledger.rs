//! Exactly-once claims on relative paths.
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of relative paths already handed to the fan-out.
///
/// Shared across every root's walk. The lock makes `claim` atomic, so the
/// at-most-once guarantee survives even if dispatch moves off one thread.
#[derive(Debug, Default)]
pub struct PathLedger {
    seen: Mutex<HashSet<PathBuf>>,
}

impl PathLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once per distinct path.
    pub fn claim(&self, path: &Path) -> bool {
        let mut seen = self.seen.lock();
        if seen.contains(path) {
            return false;
        }
        seen.insert(path.to_path_buf())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.seen.lock().len()
    }
}
