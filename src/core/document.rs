//! File handles over disk-backed documents
//!
//! A [`FileHandle`] buffers one document's text between `open` and `close`,
//! remembers the disk modification time it last saw, and answers path
//! questions through its [`PathResolver`].
//!
//! Misuse by the owner (saving a closed handle, opening a file that does not
//! exist) panics. Disk failures are reported as values.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::config::HandleConfig;
use super::file_system::{Disk, DiskError};
use super::image_links::{self, ImageLink};
use super::kind::{DocumentKind, FileKind};
use super::location::Location;
use super::paths;
use super::resolver::{FolderIndexFile, NoteDirectory, NoteFile, OrphanFile, PathResolver};

/// Recoverable failures while loading a document
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: DiskError,
    },

    #[error("Failed to query modification time of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: DiskError,
    },
}

/// In-memory handle over one disk-backed document
#[derive(Debug)]
pub struct FileHandle {
    name: String,
    document_kind: DocumentKind,
    file_kind: FileKind,
    modifiable: bool,
    created_time_utc: DateTime<Utc>,
    modified_time_utc: DateTime<Utc>,
    opened: bool,
    /// Empty whenever `opened` is false
    content: String,
    /// Disk modification time seen at the last open, reload or save
    last_known_disk_modified: Option<SystemTime>,
    resolver: Box<dyn PathResolver>,
    disk: Arc<dyn Disk>,
}

impl FileHandle {
    /// Create a closed, modifiable handle stamped with the current time
    pub fn new(
        name: impl Into<String>,
        file_kind: FileKind,
        resolver: impl PathResolver + 'static,
        disk: Arc<dyn Disk>,
    ) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            document_kind: DocumentKind::from_name(&name),
            name,
            file_kind,
            modifiable: true,
            created_time_utc: now,
            modified_time_utc: now,
            opened: false,
            content: String::new(),
            last_known_disk_modified: None,
            resolver: Box::new(resolver),
            disk,
        }
    }

    /// Handle for a note inside a notebook directory
    pub fn note(
        directory: &Arc<NoteDirectory>,
        name: impl Into<String>,
        disk: Arc<dyn Disk>,
    ) -> Self {
        let name = name.into();
        let resolver = NoteFile::new(directory, name.clone());
        Self::new(name, FileKind::Note, resolver, disk)
    }

    /// Handle for a document outside any notebook
    pub fn orphan(path: impl Into<PathBuf>, config: &HandleConfig, disk: Arc<dyn Disk>) -> Self {
        let resolver = OrphanFile::new(path, config);
        Self::new(resolver.name(), FileKind::Orphan, resolver, disk)
    }

    /// Handle for the index document of a plain folder
    pub fn folder_index(
        folder: impl Into<PathBuf>,
        name: impl Into<String>,
        config: &HandleConfig,
        disk: Arc<dyn Disk>,
    ) -> Self {
        let name = name.into();
        let resolver = FolderIndexFile::new(folder, name.clone(), config);
        Self::new(name, FileKind::OrphanFolderIndex, resolver, disk)
    }

    /// Set whether the document may be saved
    pub fn with_modifiable(mut self, modifiable: bool) -> Self {
        self.modifiable = modifiable;
        self
    }

    /// Set the creation and modification timestamps known to the owner
    pub fn with_times(mut self, created: DateTime<Utc>, modified: DateTime<Utc>) -> Self {
        self.created_time_utc = created;
        self.modified_time_utc = modified;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display title: the name without its suffix
    pub fn title(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone())
    }

    pub fn document_kind(&self) -> DocumentKind {
        self.document_kind
    }

    pub fn file_kind(&self) -> FileKind {
        self.file_kind
    }

    pub fn is_modifiable(&self) -> bool {
        self.modifiable
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    pub fn created_time_utc(&self) -> DateTime<Utc> {
        self.created_time_utc
    }

    pub fn modified_time_utc(&self) -> DateTime<Utc> {
        self.modified_time_utc
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the buffered content.
    ///
    /// # Panics
    ///
    /// If the handle is not opened.
    pub fn set_content(&mut self, content: impl Into<String>) {
        assert!(self.opened, "cannot set content of closed file {}", self.name);
        self.content = content.into();
    }

    pub fn resolver(&self) -> &dyn PathResolver {
        self.resolver.as_ref()
    }

    /// Load the document from disk. Does nothing if already opened.
    ///
    /// A failed read leaves the handle closed.
    ///
    /// # Panics
    ///
    /// If the name is empty or the document does not exist on disk.
    pub fn open(&mut self) -> Result<(), OpenError> {
        if self.opened {
            return Ok(());
        }

        assert!(!self.name.is_empty(), "cannot open a file without a name");
        assert!(self.content.is_empty(), "closed file {} still holds content", self.name);

        let path = self.resolver.fetch_path();
        assert!(self.disk.exists(&path), "cannot open missing file {}", path.display());

        let (content, modified) = self.load(&path)?;
        self.content = content;
        self.last_known_disk_modified = Some(modified);
        self.opened = true;

        tracing::debug!("Opened {}", path.display());
        Ok(())
    }

    /// Drop the buffered content. Unsaved edits are lost.
    pub fn close(&mut self) {
        if !self.opened {
            return;
        }

        self.content.clear();
        self.opened = false;
        tracing::debug!("Closed {}", self.name);
    }

    /// Write the buffered content to disk, returning whether it succeeded.
    ///
    /// Timestamps only move on success.
    ///
    /// # Panics
    ///
    /// If the handle is not opened or not modifiable.
    pub fn save(&mut self) -> bool {
        assert!(self.opened, "cannot save closed file {}", self.name);
        assert!(self.modifiable, "cannot save read-only file {}", self.name);

        let path = self.resolver.fetch_path();
        if let Err(e) = self.disk.write(&path, &self.content) {
            tracing::error!("Failed to save file {}: {}", path.display(), e);
            return false;
        }

        self.last_known_disk_modified = match self.disk.modified(&path) {
            Ok(modified) => Some(modified),
            Err(e) => {
                // Without a timestamp the next check reports a change
                tracing::warn!(
                    "Saved {} but could not read its modification time: {}",
                    path.display(),
                    e
                );
                None
            }
        };
        self.modified_time_utc = Utc::now();

        tracing::info!("Saved document: {}", path.display());
        true
    }

    /// Replace the buffer with what is on disk now, discarding edits.
    ///
    /// A failed read keeps the previous content and timestamp.
    ///
    /// # Panics
    ///
    /// If the handle is not opened or the document no longer exists.
    pub fn reload(&mut self) -> Result<(), OpenError> {
        assert!(self.opened, "cannot reload closed file {}", self.name);

        let path = self.resolver.fetch_path();
        assert!(self.disk.exists(&path), "cannot reload missing file {}", path.display());

        let (content, modified) = self.load(&path)?;
        self.content = content;
        self.last_known_disk_modified = Some(modified);

        tracing::debug!("Reloaded {}", path.display());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<(String, SystemTime), OpenError> {
        let content = self.disk.read_to_string(path).map_err(|source| OpenError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let modified = self.disk.modified(path).map_err(|source| OpenError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((content, modified))
    }

    /// Whether the file on disk changed since it was last loaded or saved.
    ///
    /// A file that vanished or cannot be queried counts as changed.
    pub fn is_changed_outside(&self) -> bool {
        let path = self.resolver.fetch_path();
        match self.disk.modified(&path) {
            Ok(modified) => self.last_known_disk_modified != Some(modified),
            Err(e) => {
                tracing::debug!("Treating {} as changed: {}", path.display(), e);
                true
            }
        }
    }

    /// Absolute path of the backing document
    pub fn fetch_path(&self) -> PathBuf {
        self.resolver.fetch_path()
    }

    /// Directory the document logically lives in
    pub fn fetch_base_path(&self) -> PathBuf {
        self.resolver.fetch_base_path()
    }

    /// The document's private image folder
    pub fn fetch_image_folder_path(&self) -> PathBuf {
        self.resolver.fetch_image_folder_path()
    }

    /// Where relative references in this document resolve from
    pub fn base_url(&self) -> Location {
        Location::classify(self.disk.as_ref(), &self.resolver.fetch_base_path())
    }

    /// Whether images in `folder` are managed by this document: any direct
    /// subfolder of the base path, or the image folder itself
    pub fn is_internal_image_folder(&self, folder: &Path) -> bool {
        paths::paths_equal(&paths::base_path_of(folder), &self.resolver.fetch_base_path())
            || paths::paths_equal(folder, &self.resolver.fetch_image_folder_path())
    }

    /// Images referenced by the buffered content
    pub fn image_links(&self) -> Vec<ImageLink> {
        image_links::scan(self)
    }

    /// Images referenced by the buffered content that live in an internal
    /// image folder
    pub fn internal_images(&self) -> Vec<ImageLink> {
        self.image_links()
            .into_iter()
            .filter(|link| link.is_internal())
            .collect()
    }
}
