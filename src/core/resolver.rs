//! Path resolution for the different kinds of file handles
//!
//! Every handle variant answers the same three questions: where is the
//! document, which directory does it logically live in, and where do its
//! images go. Answers are composed from immutable identity on every call,
//! so they can never go stale; none of them touch the disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use super::config::HandleConfig;
use super::paths;

/// Path queries a file handle delegates to its variant
pub trait PathResolver: fmt::Debug + Send + Sync {
    /// Absolute path of the backing document
    fn fetch_path(&self) -> PathBuf;

    /// Directory the document logically lives in
    fn fetch_base_path(&self) -> PathBuf;

    /// The document's private image folder
    fn fetch_image_folder_path(&self) -> PathBuf;

    /// The image folder as it should be written inside a link: the
    /// configured relative name, or the absolute path
    fn image_folder_in_link(&self) -> String;
}

/// Link spelling for an image folder setting
fn link_form(folder: &str, resolved: &Path) -> String {
    if Path::new(folder).is_absolute() {
        paths::normalize(resolved)
    } else {
        paths::normalize(Path::new(folder))
    }
}

/// A directory inside a notebook, owned by the notebook.
///
/// Notes only keep a [`Weak`] reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDirectory {
    path: PathBuf,
    image_folder: String,
}

impl NoteDirectory {
    /// Create a directory using the configured image folder
    pub fn new(path: impl Into<PathBuf>, config: &HandleConfig) -> Arc<Self> {
        Self::with_image_folder(path, config.image_folder.clone())
    }

    /// Create a directory with an explicit image folder setting
    pub fn with_image_folder(
        path: impl Into<PathBuf>,
        image_folder: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            path: path.into(),
            image_folder: image_folder.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image_folder(&self) -> &str {
        &self.image_folder
    }
}

/// A note stored in a notebook directory
#[derive(Debug, Clone)]
pub struct NoteFile {
    directory: Weak<NoteDirectory>,
    name: String,
}

impl NoteFile {
    pub fn new(directory: &Arc<NoteDirectory>, name: impl Into<String>) -> Self {
        Self {
            directory: Arc::downgrade(directory),
            name: name.into(),
        }
    }

    /// The owning directory.
    ///
    /// # Panics
    ///
    /// If the directory was dropped while this note is still in use.
    fn directory(&self) -> Arc<NoteDirectory> {
        self.directory.upgrade().unwrap_or_else(|| {
            panic!("directory of note {} was dropped while the note is in use", self.name)
        })
    }
}

impl PathResolver for NoteFile {
    fn fetch_path(&self) -> PathBuf {
        self.directory().path.join(&self.name)
    }

    fn fetch_base_path(&self) -> PathBuf {
        self.directory().path.clone()
    }

    fn fetch_image_folder_path(&self) -> PathBuf {
        let directory = self.directory();
        paths::resolve_folder(&directory.path, &directory.image_folder)
    }

    fn image_folder_in_link(&self) -> String {
        link_form(&self.directory().image_folder, &self.fetch_image_folder_path())
    }
}

/// A document outside any notebook, known only by its path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanFile {
    path: PathBuf,
    image_folder: String,
}

impl OrphanFile {
    /// Create an orphan using the configured orphan image folder
    pub fn new(path: impl Into<PathBuf>, config: &HandleConfig) -> Self {
        Self {
            path: path.into(),
            image_folder: config.orphan_image_folder.clone(),
        }
    }

    /// Override the image folder for this document only
    pub fn with_image_folder(mut self, folder: impl Into<String>) -> Self {
        self.image_folder = folder.into();
        self
    }

    /// File name component of the path
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

impl PathResolver for OrphanFile {
    fn fetch_path(&self) -> PathBuf {
        self.path.clone()
    }

    fn fetch_base_path(&self) -> PathBuf {
        paths::base_path_of(&self.path)
    }

    fn fetch_image_folder_path(&self) -> PathBuf {
        paths::resolve_folder(&self.fetch_base_path(), &self.image_folder)
    }

    fn image_folder_in_link(&self) -> String {
        link_form(&self.image_folder, &self.fetch_image_folder_path())
    }
}

/// The index document of a plain folder, e.g. `docs/README.md`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderIndexFile {
    folder: PathBuf,
    name: String,
    image_folder: String,
}

impl FolderIndexFile {
    pub fn new(folder: impl Into<PathBuf>, name: impl Into<String>, config: &HandleConfig) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
            image_folder: config.image_folder.clone(),
        }
    }
}

impl PathResolver for FolderIndexFile {
    fn fetch_path(&self) -> PathBuf {
        self.folder.join(&self.name)
    }

    fn fetch_base_path(&self) -> PathBuf {
        self.folder.clone()
    }

    fn fetch_image_folder_path(&self) -> PathBuf {
        paths::resolve_folder(&self.folder, &self.image_folder)
    }

    fn image_folder_in_link(&self) -> String {
        link_form(&self.image_folder, &self.fetch_image_folder_path())
    }
}
