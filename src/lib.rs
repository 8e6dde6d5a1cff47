//! Notefile - in-memory handles over disk-backed documents
//!
//! A [`FileHandle`] owns one document's text while it is open, notices when
//! the file changes behind its back, and knows where the document's images
//! and relative links resolve.
//!
//! ```no_run
//! use std::sync::Arc;
//! use notefile::{FileHandle, HandleConfig, LocalDisk};
//!
//! # fn main() -> Result<(), notefile::OpenError> {
//! let config = HandleConfig::default();
//! let mut handle = FileHandle::orphan("/notes/todo.md", &config, Arc::new(LocalDisk));
//! handle.open()?;
//! handle.set_content(format!("{}\n- [ ] water plants\n", handle.content()));
//! if !handle.is_changed_outside() {
//!     handle.save();
//! }
//! handle.close();
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::config::HandleConfig;
pub use crate::core::document::{FileHandle, OpenError};
pub use crate::core::file_system::{BundledDisk, Disk, DiskError, LocalDisk};
pub use crate::core::image_links::{ImageLink, ImageLinkKind};
pub use crate::core::kind::{DocumentKind, FileKind};
pub use crate::core::location::Location;
pub use crate::core::resolver::{FolderIndexFile, NoteDirectory, NoteFile, OrphanFile, PathResolver};
