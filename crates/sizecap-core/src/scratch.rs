//! Scoped scratch storage for candidate encodings.
//!
//! The optimizer spills each candidate here and measures it through the
//! filesystem, so the size check observes what a caller writing the result
//! to disk would observe. The store owns a temporary directory that is
//! removed when the store is dropped - on success, failure, or early return
//! alike - so no scratch file outlives the call that created it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};
use thiserror::Error;

/// Filesystem failures while working with scratch storage.
#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("Failed to create scratch directory: {0}")]
    Create(#[source] io::Error),

    #[error("Failed to write scratch file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to measure scratch file {path}: {source}")]
    Measure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove scratch file {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A scoped temporary directory for one optimization run.
#[derive(Debug)]
pub struct ScratchStore {
    dir: TempDir,
}

impl ScratchStore {
    /// Create a store under the system temporary directory.
    pub fn new() -> Result<Self, ScratchError> {
        let dir = Builder::new()
            .prefix("sizecap-")
            .tempdir()
            .map_err(ScratchError::Create)?;
        Ok(Self { dir })
    }

    /// Create a store under `root` instead of the system default.
    pub fn in_dir(root: &Path) -> Result<Self, ScratchError> {
        let dir = Builder::new()
            .prefix("sizecap-")
            .tempdir_in(root)
            .map_err(ScratchError::Create)?;
        Ok(Self { dir })
    }

    /// Path of the scratch directory itself.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `bytes` under `name` and return the full path.
    ///
    /// Only the final path component of `name` is used; callers may pass a
    /// full filename without worrying about separators in it.
    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, ScratchError> {
        let name = Path::new(name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("scratch"));
        let path = self.dir.path().join(name);

        fs::write(&path, bytes).map_err(|source| ScratchError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Byte length of a previously written entry, measured from the
    /// filesystem rather than from memory.
    pub fn measure(&self, path: &Path) -> Result<u64, ScratchError> {
        fs::metadata(path)
            .map(|meta| meta.len())
            .map_err(|source| ScratchError::Measure {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Remove an entry. Removing a path that is already gone is not an
    /// error.
    pub fn remove(&self, path: &Path) -> Result<(), ScratchError> {
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path).map_err(|source| ScratchError::Remove {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_measure_remove() {
        let store = ScratchStore::new().unwrap();

        let path = store.write("candidate.jpg", b"0123456789").unwrap();
        assert!(path.exists());
        assert_eq!(store.measure(&path).unwrap(), 10);

        store.remove(&path).unwrap();
        assert!(!path.exists());

        // Second removal is a no-op
        store.remove(&path).unwrap();
    }

    #[test]
    fn test_drop_removes_directory() {
        let store = ScratchStore::new().unwrap();
        let dir = store.path().to_path_buf();
        store.write("leftover.jpg", b"abc").unwrap();

        drop(store);
        assert!(!dir.exists());
    }

    #[test]
    fn test_in_dir_uses_given_root() {
        let root = tempfile::tempdir().unwrap();
        let store = ScratchStore::in_dir(root.path()).unwrap();

        assert!(store.path().starts_with(root.path()));
    }

    #[test]
    fn test_write_strips_path_components() {
        let store = ScratchStore::new().unwrap();

        let path = store.write("nested/dir/photo.png", b"x").unwrap();
        assert_eq!(path.parent(), Some(store.path()));
        assert!(path.ends_with("photo.png"));
    }

    #[test]
    fn test_measure_missing_entry_fails() {
        let store = ScratchStore::new().unwrap();
        let missing = store.path().join("nope.jpg");

        assert!(matches!(
            store.measure(&missing),
            Err(ScratchError::Measure { .. })
        ));
    }
}
