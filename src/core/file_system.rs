//! Disk access used by file handles
//!
//! Handles never call `std::fs` directly; they go through [`Disk`] so the
//! owning application can swap in bundled resources or instrumented storage.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::paths::{self, RESOURCE_PREFIX};

/// Errors reported by a [`Disk`]
#[derive(Debug, thiserror::Error)]
pub enum DiskError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Read-only location: {0}")]
    ReadOnly(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DiskError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Storage a file handle reads from and writes to
pub trait Disk: fmt::Debug + Send + Sync {
    /// Read the whole file as text
    fn read_to_string(&self, path: &Path) -> Result<String, DiskError>;

    /// Replace the file's content. Not required to be atomic.
    fn write(&self, path: &Path, content: &str) -> Result<(), DiskError>;

    /// Whether anything (file or directory) exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Last modification time, at whatever precision the storage keeps
    fn modified(&self, path: &Path) -> Result<SystemTime, DiskError>;

    /// Whether `path` lives on the native filesystem
    fn is_native_path(&self, path: &Path) -> bool {
        paths::is_native_path(path)
    }
}

/// The native filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDisk;

impl Disk for LocalDisk {
    fn read_to_string(&self, path: &Path) -> Result<String, DiskError> {
        fs::read_to_string(path).map_err(|e| DiskError::from_io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), DiskError> {
        fs::write(path, content).map_err(|e| DiskError::from_io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn modified(&self, path: &Path) -> Result<SystemTime, DiskError> {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| DiskError::from_io(path, e))
    }
}

/// Native filesystem plus a set of read-only resources under `:/`.
///
/// Resource directories exist implicitly as soon as one resource lives
/// below them.
#[derive(Debug, Clone, Default)]
pub struct BundledDisk {
    resources: BTreeMap<String, String>,
    native: LocalDisk,
}

impl BundledDisk {
    /// Create a disk with no bundled resources
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource; `path` must start with `:/`
    pub fn with_resource(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        let key = paths::normalize(path.as_ref());
        debug_assert!(key.starts_with(RESOURCE_PREFIX), "not a resource path: {key}");
        self.resources.insert(key, content.into());
        self
    }

    fn resource_dir_exists(&self, key: &str) -> bool {
        let dir = if key.ends_with('/') {
            key.to_string()
        } else {
            format!("{key}/")
        };
        self.resources.keys().any(|k| k.starts_with(&dir))
    }
}

impl Disk for BundledDisk {
    fn read_to_string(&self, path: &Path) -> Result<String, DiskError> {
        if self.native.is_native_path(path) {
            return self.native.read_to_string(path);
        }
        self.resources
            .get(&paths::normalize(path))
            .cloned()
            .ok_or_else(|| DiskError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), DiskError> {
        if self.native.is_native_path(path) {
            return self.native.write(path, content);
        }
        Err(DiskError::ReadOnly(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        if self.native.is_native_path(path) {
            return self.native.exists(path);
        }
        let key = paths::normalize(path);
        self.resources.contains_key(&key) || self.resource_dir_exists(&key)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime, DiskError> {
        if self.native.is_native_path(path) {
            return self.native.modified(path);
        }
        // Bundled content never changes while the program runs
        if self.exists(path) {
            Ok(SystemTime::UNIX_EPOCH)
        } else {
            Err(DiskError::NotFound(path.to_path_buf()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");

        LocalDisk.write(&path, "# Title").unwrap();
        assert!(LocalDisk.exists(&path));
        assert_eq!(LocalDisk.read_to_string(&path).unwrap(), "# Title");
        assert!(LocalDisk.modified(&path).is_ok());
    }

    #[test]
    fn test_local_disk_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.md");

        assert!(!LocalDisk.exists(&path));
        assert!(matches!(LocalDisk.read_to_string(&path), Err(DiskError::NotFound(_))));
        assert!(matches!(LocalDisk.modified(&path), Err(DiskError::NotFound(_))));
    }

    #[test]
    fn test_bundled_disk_resources() {
        let disk = BundledDisk::new().with_resource(":/docs/welcome.md", "hello");

        assert!(disk.exists(Path::new(":/docs/welcome.md")));
        assert!(disk.exists(Path::new(":/docs")));
        assert!(!disk.exists(Path::new(":/doc")));
        assert!(!disk.is_native_path(Path::new(":/docs")));
        assert_eq!(disk.read_to_string(Path::new(":/docs/welcome.md")).unwrap(), "hello");
        assert_eq!(
            disk.modified(Path::new(":/docs/welcome.md")).unwrap(),
            SystemTime::UNIX_EPOCH
        );
        assert!(matches!(
            disk.write(Path::new(":/docs/welcome.md"), "changed"),
            Err(DiskError::ReadOnly(_))
        ));
    }

    #[test]
    fn test_bundled_disk_falls_through_to_native() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("native.txt");
        let disk = BundledDisk::new();

        disk.write(&path, "native").unwrap();
        assert!(disk.exists(&path));
        assert_eq!(disk.read_to_string(&path).unwrap(), "native");
    }
}
