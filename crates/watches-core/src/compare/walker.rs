/// Per-root directory walk using `jwalk`.
///
/// Entries come back sorted within each directory and in pre-order, so a
/// single root is always walked in the same order. Only regular files are
/// yielded; directories are descended into, while symlinks and special
/// files are skipped without being opened.
use std::path::{Path, PathBuf};

/// One item produced by walking a root.
#[derive(Debug)]
pub enum WalkItem {
    /// A regular file, expressed relative to the root it was found under.
    File(PathBuf),
    /// An entry the walker could not read (typically access denied on a
    /// directory).
    Error {
        path: Option<PathBuf>,
        message: String,
    },
}

/// Walk `root` and yield its regular files as relative paths.
pub fn walk_root(root: &Path) -> impl Iterator<Item = WalkItem> + '_ {
    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    walker.into_iter().filter_map(move |entry_result| {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                return Some(WalkItem::Error {
                    path: err.path().map(Path::to_path_buf),
                    message: format!("{err}"),
                })
            }
        };

        if !entry.file_type().is_file() {
            return None;
        }

        let path = entry.path();
        match path.strip_prefix(root) {
            Ok(relative) => Some(WalkItem::File(relative.to_path_buf())),
            Err(_) => Some(WalkItem::Error {
                message: format!("walked outside of root {}", root.display()),
                path: Some(path),
            }),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn files(root: &Path) -> Vec<PathBuf> {
        walk_root(root)
            .filter_map(|item| match item {
                WalkItem::File(p) => Some(p),
                WalkItem::Error { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_yields_relative_regular_files_only() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("alpha/deep")).unwrap();
        std::fs::create_dir_all(tmp.path().join("empty")).unwrap();
        std::fs::write(tmp.path().join("alpha/a.txt"), b"a").unwrap();
        std::fs::write(tmp.path().join("alpha/deep/b.txt"), b"b").unwrap();
        std::fs::write(tmp.path().join("top.txt"), b"t").unwrap();

        let mut found = files(tmp.path());
        found.sort();
        assert_eq!(
            found,
            vec![
                PathBuf::from("alpha/a.txt"),
                PathBuf::from("alpha/deep/b.txt"),
                PathBuf::from("top.txt"),
            ]
        );
    }

    #[test]
    fn test_walk_order_is_stable() {
        let tmp = TempDir::new().unwrap();
        for name in ["c", "a", "b"] {
            std::fs::create_dir_all(tmp.path().join(name)).unwrap();
            std::fs::write(tmp.path().join(name).join("f"), name).unwrap();
        }
        assert_eq!(files(tmp.path()), files(tmp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("real.txt"), b"r").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real.txt"), tmp.path().join("link.txt"))
            .unwrap();

        assert_eq!(files(tmp.path()), vec![PathBuf::from("real.txt")]);
    }
}
