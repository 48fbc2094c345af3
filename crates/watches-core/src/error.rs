//! Error types for the comparison engine.
//!
//! Only [`ConfigError`] is fatal to a run. [`FileAccessError`] is scoped to a
//! single (root, relative path) unit of work and degrades that path's
//! grouping instead of aborting anything.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid input detected before any traversal starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no search paths specified")]
    NoRoots,

    #[error("{} does not exist or cannot be accessed: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Failure to fingerprint one file under one root.
#[derive(Debug, Error)]
pub enum FileAccessError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot stat {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    #[error("cannot read {} @ {offset}: {source}", path.display())]
    Read {
        path: PathBuf,
        offset: u64,
        #[source]
        source: io::Error,
    },
}

impl FileAccessError {
    /// `true` when the file simply does not exist under this root.
    pub fn is_not_found(&self) -> bool {
        match self {
            FileAccessError::Open { source, .. } | FileAccessError::Metadata { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Failure to set up the engine itself (thread pool or worker thread).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build fingerprint pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn comparison thread: {0}")]
    Spawn(#[source] io::Error),
}
