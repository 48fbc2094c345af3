//! Content fingerprinting: streaming SHA-256 over a single file.
//!
//! Files are read in bounded chunks so peak memory per task never exceeds
//! the chunk size, however large the file. The handle lives only for the
//! duration of one call.
use crate::error::FileAccessError;
use crate::model::{FileDigest, Fingerprint};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// Default read chunk: 16 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 24;

/// Smallest buffer allocated for a file whose reported size is tiny or zero.
const MIN_BUFFER_SIZE: usize = 8 * 1024;

/// Computes fingerprints for files addressed by (root, relative path).
#[derive(Debug, Clone, Copy)]
pub struct Fingerprinter {
    chunk_size: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Fingerprinter {
    /// A zero chunk size is bumped to one byte.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Fingerprint `relative` as it exists under `root`.
    pub fn fingerprint(&self, root: &Path, relative: &Path) -> Result<FileDigest, FileAccessError> {
        self.digest_file(&root.join(relative))
    }

    /// Fingerprint the file at `path`.
    ///
    /// Only regular files are opened. Symlinks, directories and special
    /// files are rejected from `lstat` alone, so a FIFO never blocks the
    /// caller in `open`. Every byte actually readable is hashed. Reaching
    /// end-of-file before the size reported by metadata is not an error, and
    /// neither is reading past it.
    pub fn digest_file(&self, path: &Path) -> Result<FileDigest, FileAccessError> {
        let link_meta =
            std::fs::symlink_metadata(path).map_err(|source| FileAccessError::Metadata {
                path: path.to_path_buf(),
                source,
            })?;
        if !link_meta.file_type().is_file() {
            return Err(FileAccessError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let mut file = File::open(path).map_err(|source| FileAccessError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Re-check through the handle in case the entry was swapped after lstat.
        let meta = file.metadata().map_err(|source| FileAccessError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(FileAccessError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let expected = meta.len();
        let floor = MIN_BUFFER_SIZE.min(self.chunk_size);
        let capacity = usize::try_from(expected)
            .unwrap_or(usize::MAX)
            .clamp(floor, self.chunk_size);
        let mut buf = vec![0u8; capacity];

        let mut hasher = Sha256::new();
        let mut offset: u64 = 0;
        loop {
            match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buf[..n]);
                    offset += n as u64;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(FileAccessError::Read {
                        path: path.to_path_buf(),
                        offset,
                        source,
                    })
                }
            }
        }

        if offset != expected {
            debug!(
                "{}: read {offset} bytes, metadata reported {expected}",
                path.display()
            );
        }

        Ok(FileDigest {
            fingerprint: Fingerprint::from_hex(format!("{:x}", hasher.finalize())),
            bytes_read: offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_known_digests() {
        let tmp = TempDir::new().unwrap();
        let fp = Fingerprinter::default();

        let empty = fp.digest_file(&write(tmp.path(), "empty", b"")).unwrap();
        assert_eq!(empty.fingerprint.as_str(), EMPTY_SHA256);
        assert_eq!(empty.bytes_read, 0);

        let abc = fp.digest_file(&write(tmp.path(), "abc", b"abc")).unwrap();
        assert_eq!(abc.fingerprint.as_str(), ABC_SHA256);
        assert_eq!(abc.bytes_read, 3);
    }

    #[test]
    fn test_digest_independent_of_chunk_size() {
        let tmp = TempDir::new().unwrap();
        let content: Vec<u8> = (0..10_007u32).map(|i| (i * 31 % 251) as u8).collect();
        let path = write(tmp.path(), "data.bin", &content);

        let expected = format!("{:x}", Sha256::digest(&content));
        for chunk in [1, 7, 4096, 10_007, 10_008, DEFAULT_CHUNK_SIZE] {
            let digest = Fingerprinter::new(chunk).digest_file(&path).unwrap();
            assert_eq!(digest.fingerprint.as_str(), expected, "chunk size {chunk}");
            assert_eq!(digest.bytes_read, content.len() as u64);
        }
    }

    #[test]
    fn test_single_byte_change_changes_digest() {
        let tmp = TempDir::new().unwrap();
        let mut content = vec![0x5Au8; 4_000];
        let a = write(tmp.path(), "a", &content);
        content[1_234] ^= 0x01;
        let b = write(tmp.path(), "b", &content);

        let fp = Fingerprinter::new(1_000);
        assert_ne!(
            fp.digest_file(&a).unwrap().fingerprint,
            fp.digest_file(&b).unwrap().fingerprint
        );
    }

    #[test]
    fn test_fingerprint_joins_root_and_relative() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("sub")).unwrap();
        write(&tmp.path().join("sub"), "file.txt", b"abc");

        let digest = Fingerprinter::default()
            .fingerprint(tmp.path(), Path::new("sub/file.txt"))
            .unwrap();
        assert_eq!(digest.fingerprint.as_str(), ABC_SHA256);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = Fingerprinter::default()
            .fingerprint(tmp.path(), Path::new("absent.txt"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn test_directory_is_not_fingerprinted() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("dir")).unwrap();
        let err = Fingerprinter::default()
            .fingerprint(tmp.path(), Path::new("dir"))
            .unwrap_err();
        assert!(matches!(err, FileAccessError::NotAFile { .. }));
        assert!(!err.is_not_found());
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo_is_rejected_without_blocking() {
        let tmp = TempDir::new().unwrap();
        let fifo = tmp.path().join("pipe");
        let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
        assert!(status.success());

        let err = Fingerprinter::default().digest_file(&fifo).unwrap_err();
        assert!(matches!(err, FileAccessError::NotAFile { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_not_followed() {
        let tmp = TempDir::new().unwrap();
        let target = write(tmp.path(), "target.txt", b"abc");
        let link = tmp.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = Fingerprinter::default().digest_file(&link).unwrap_err();
        assert!(matches!(err, FileAccessError::NotAFile { .. }));
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        assert_eq!(Fingerprinter::new(0).chunk_size(), 1);
    }
}
