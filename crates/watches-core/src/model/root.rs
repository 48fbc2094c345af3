//! The ordered set of search roots a comparison runs over.
//!
//! Order is preserved exactly as supplied (minus repeats) so that every
//! report lists roots in the same, predictable order.
use crate::error::ConfigError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Position of a root within its [`RootSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RootIndex(pub u32);

impl RootIndex {
    /// Create a new `RootIndex` from a `usize`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "RootIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A validated, non-empty list of absolute root directories.
#[derive(Debug, Clone)]
pub struct RootSet {
    roots: Vec<PathBuf>,
}

impl RootSet {
    /// Validate `paths` and build the set.
    ///
    /// Every path must exist and be a directory. Paths are canonicalised so
    /// the same directory named twice (`./a` and `/abs/a`) only counts once;
    /// the first occurrence keeps its position.
    pub fn new<I>(paths: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        let mut roots: Vec<PathBuf> = Vec::new();

        for path in paths {
            let path: PathBuf = path.into();
            let meta = std::fs::metadata(&path).map_err(|source| ConfigError::NotFound {
                path: path.clone(),
                source,
            })?;
            if !meta.is_dir() {
                return Err(ConfigError::NotADirectory { path });
            }

            let canonical = std::fs::canonicalize(&path)
                .map_err(|source| ConfigError::NotFound { path, source })?;

            if roots.contains(&canonical) {
                debug!("Ignoring repeated root {}", canonical.display());
                continue;
            }
            roots.push(canonical);
        }

        if roots.is_empty() {
            return Err(ConfigError::NoRoots);
        }
        Ok(Self { roots })
    }

    /// Never zero; construction rejects an empty list.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn get(&self, index: RootIndex) -> &Path {
        &self.roots[index.idx()]
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Iterate roots in supplied order together with their index.
    pub fn iter(&self) -> impl Iterator<Item = (RootIndex, &Path)> + '_ {
        self.roots
            .iter()
            .enumerate()
            .map(|(i, p)| (RootIndex::new(i), p.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_input_is_rejected() {
        let err = RootSet::new(Vec::<PathBuf>::new()).unwrap_err();
        assert!(matches!(err, ConfigError::NoRoots));
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = RootSet::new([missing.clone()]).unwrap_err();
        match err {
            ConfigError::NotFound { path, .. } => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_file_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = RootSet::new([file]).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory { .. }));
    }

    #[test]
    fn test_order_preserved_and_repeats_dropped() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let set = RootSet::new([
            b.path().to_path_buf(),
            a.path().to_path_buf(),
            b.path().to_path_buf(),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(RootIndex(0)), std::fs::canonicalize(b.path()).unwrap());
        assert_eq!(set.get(RootIndex(1)), std::fs::canonicalize(a.path()).unwrap());
        assert!(set.paths().iter().all(|p| p.is_absolute()));
    }
}
