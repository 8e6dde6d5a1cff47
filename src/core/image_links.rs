//! Image references inside Markdown documents
//!
//! Used to find out which images a document owns, e.g. to clean up its
//! image folder when the document is deleted.

use std::ops::Range;
use std::path::{Path, PathBuf};

use pulldown_cmark::{Event, Options, Parser, Tag};

use super::document::FileHandle;
use super::location::local_dir_url;
use super::paths;

/// Where an image reference points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLinkKind {
    /// Relative path into one of the document's internal image folders
    LocalRelativeInternal,
    /// Relative path anywhere else
    LocalRelativeExternal,
    /// Absolute filesystem path or `file://` URL
    LocalAbsolute,
    /// URL with a non-file scheme
    Remote,
}

/// An image reference found in document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    /// Destination exactly as written
    pub url: String,
    /// Resolved file path, for local links
    pub path: Option<PathBuf>,
    pub kind: ImageLinkKind,
    /// Byte range of the whole `![...](...)` in the content
    pub range: Range<usize>,
}

impl ImageLink {
    pub fn is_internal(&self) -> bool {
        self.kind == ImageLinkKind::LocalRelativeInternal
    }

    pub fn is_local(&self) -> bool {
        self.kind != ImageLinkKind::Remote
    }
}

/// Collect image links from the handle's buffered content.
///
/// Only Markdown documents are scanned; a closed handle has no links.
pub fn scan(handle: &FileHandle) -> Vec<ImageLink> {
    if !handle.document_kind().is_markdown() {
        return Vec::new();
    }

    let base = handle.fetch_base_path();
    Parser::new_ext(handle.content(), Options::ENABLE_TABLES)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::Image { dest_url, .. }) if !dest_url.is_empty() => {
                Some(classify(handle, &base, &dest_url, range))
            }
            _ => None,
        })
        .collect()
}

fn classify(handle: &FileHandle, base: &Path, url: &str, range: Range<usize>) -> ImageLink {
    let (path, kind) = if let Some(rest) = url.strip_prefix("file://") {
        (Some(PathBuf::from(rest)), ImageLinkKind::LocalAbsolute)
    } else if has_scheme(url) {
        (None, ImageLinkKind::Remote)
    } else if Path::new(url).is_absolute() {
        (Some(PathBuf::from(url)), ImageLinkKind::LocalAbsolute)
    } else {
        let resolved = PathBuf::from(paths::normalize(&resolve_relative(base, url)));
        let folder = paths::base_path_of(&resolved);
        let kind = if handle.is_internal_image_folder(&folder) {
            ImageLinkKind::LocalRelativeInternal
        } else {
            ImageLinkKind::LocalRelativeExternal
        };
        (Some(resolved), kind)
    };

    ImageLink {
        url: url.to_string(),
        path,
        kind,
        range,
    }
}

/// Join a relative link onto `base`, decoding escapes like `%20`
fn resolve_relative(base: &Path, url: &str) -> PathBuf {
    local_dir_url(base)
        .and_then(|base_url| base_url.join(url).ok())
        .and_then(|joined| joined.to_file_path().ok())
        .unwrap_or_else(|| base.join(url))
}

/// `scheme:` prefix of at least two characters, so `C:/x` is not a URL
fn has_scheme(url: &str) -> bool {
    let Some(colon) = url.find(':') else {
        return false;
    };
    let scheme = &url[..colon];
    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::HandleConfig;
    use crate::core::file_system::LocalDisk;
    use std::sync::Arc;

    fn opened(dir: &Path, name: &str, content: &str) -> FileHandle {
        std::fs::write(dir.join(name), content).unwrap();
        let mut handle =
            FileHandle::orphan(dir.join(name), &HandleConfig::default(), Arc::new(LocalDisk));
        handle.open().unwrap();
        handle
    }

    #[test]
    fn test_classifies_links() {
        let dir = tempfile::tempdir().unwrap();
        let content = "\
# Trip

![beach](_v_images/beach.png)
![logo](logo.png)
![shared](../shared/map.png)
![web](https://example.com/cat.png)
![abs](/var/pics/dog.png)
![file](file:///var/pics/fox.png)
";
        let handle = opened(dir.path(), "trip.md", content);
        let links = handle.image_links();
        let kinds: Vec<_> = links.iter().map(|l| l.kind).collect();

        assert_eq!(
            kinds,
            vec![
                ImageLinkKind::LocalRelativeInternal,
                ImageLinkKind::LocalRelativeExternal,
                ImageLinkKind::LocalRelativeExternal,
                ImageLinkKind::Remote,
                ImageLinkKind::LocalAbsolute,
                ImageLinkKind::LocalAbsolute,
            ]
        );
        assert_eq!(links[0].path, Some(dir.path().join("_v_images").join("beach.png")));
        assert_eq!(&content[links[0].range.clone()], "![beach](_v_images/beach.png)");
        assert_eq!(links[3].path, None);
        assert_eq!(links[5].path, Some(PathBuf::from("/var/pics/fox.png")));
    }

    #[test]
    fn test_relative_links_are_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let handle = opened(
            dir.path(),
            "a.md",
            "![pic](my%20pic.png) ![inner](_v_images/sun%23set.png)",
        );
        let links = handle.image_links();

        assert_eq!(links[0].url, "my%20pic.png");
        assert_eq!(links[0].path, Some(dir.path().join("my pic.png")));
        assert_eq!(links[1].kind, ImageLinkKind::LocalRelativeInternal);
        assert_eq!(links[1].path, Some(dir.path().join("_v_images").join("sun#set.png")));
    }

    #[test]
    fn test_internal_images_filter() {
        let dir = tempfile::tempdir().unwrap();
        let handle = opened(
            dir.path(),
            "a.md",
            "![one](_v_images/1.png) text ![two](other/2.png) ![three](https://x.org/3.png)",
        );

        let internal: Vec<_> = handle.internal_images().into_iter().map(|l| l.url).collect();
        assert_eq!(internal, vec!["_v_images/1.png", "other/2.png"]);
    }

    #[test]
    fn test_non_markdown_has_no_links() {
        let dir = tempfile::tempdir().unwrap();
        let handle = opened(dir.path(), "notes.txt", "![x](_v_images/x.png)");
        assert!(handle.image_links().is_empty());
    }

    #[test]
    fn test_closed_handle_has_no_links() {
        let handle =
            FileHandle::orphan("/notes/a.md", &HandleConfig::default(), Arc::new(LocalDisk));
        assert!(handle.image_links().is_empty());
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://example.com/a.png"));
        assert!(has_scheme("data:image/png;base64,AAAA"));
        assert!(!has_scheme("C:/pics/a.png"));
        assert!(!has_scheme("pics/a.png"));
    }
}
