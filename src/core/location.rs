//! Base locations for resolving a document's relative references

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use super::file_system::Disk;
use super::paths;

/// Where a document's base directory lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A directory on the native filesystem
    LocalFile(PathBuf),
    /// A directory inside the bundled resources (`:/…`)
    BundledResource(String),
    /// Something no disk knows about, kept as opaque URL text
    RemoteReference(String),
}

impl Location {
    /// Classify `base` against `disk`.
    ///
    /// Existence wins over shape: a path nothing on disk knows about is a
    /// remote reference even if it looks like a local path.
    pub fn classify(disk: &dyn Disk, base: &Path) -> Self {
        if !disk.exists(base) {
            Self::RemoteReference(base.to_string_lossy().into_owned())
        } else if disk.is_native_path(base) {
            Self::LocalFile(base.to_path_buf())
        } else {
            Self::BundledResource(paths::normalize(base))
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::LocalFile(_))
    }

    /// URL text for this location, always ending with `/`
    pub fn to_url(&self) -> String {
        match self {
            Self::LocalFile(path) => match local_dir_url(path) {
                Some(url) => url.into(),
                None => with_trailing_slash(format!("file://{}", paths::normalize(path))),
            },
            Self::BundledResource(path) => with_trailing_slash(format!("qrc{path}")),
            Self::RemoteReference(text) => with_trailing_slash(text.clone()),
        }
    }
}

/// Percent-encoded `file://` URL of a directory, with a trailing slash
pub(crate) fn local_dir_url(path: &Path) -> Option<Url> {
    let absolute = std::path::absolute(path).ok()?;
    Url::from_directory_path(absolute).ok()
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_system::{BundledDisk, LocalDisk};

    #[test]
    fn test_existing_native_dir_is_local() {
        let dir = tempfile::tempdir().unwrap();
        let location = Location::classify(&LocalDisk, dir.path());

        assert_eq!(location, Location::LocalFile(dir.path().to_path_buf()));
        assert!(location.is_local());
        let url = location.to_url();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with('/'));
    }

    #[test]
    fn test_existing_resource_dir_is_bundled() {
        let disk = BundledDisk::new().with_resource(":/help/index.md", "# Help");
        let location = Location::classify(&disk, Path::new(":/help"));

        assert_eq!(location, Location::BundledResource(":/help".to_string()));
        assert_eq!(location.to_string(), "qrc:/help/");
    }

    #[test]
    fn test_missing_path_is_remote_even_if_it_looks_local() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let location = Location::classify(&LocalDisk, &missing);

        assert!(matches!(location, Location::RemoteReference(_)));
        assert_eq!(location.to_url(), format!("{}/", missing.display()));
    }

    #[test]
    fn test_remote_url_keeps_its_text() {
        let location = Location::classify(&LocalDisk, Path::new("https://example.com/notes"));
        assert_eq!(location.to_url(), "https://example.com/notes/");
    }

    #[test]
    fn test_local_url_escapes_special_characters() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("my #notes");
        std::fs::create_dir(&notes).unwrap();

        let url = Location::classify(&LocalDisk, &notes).to_url();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("/my%20%23notes/"), "{url}");
        assert!(!url.contains('#'));

        // Relative references keep the directory
        let joined = Url::parse(&url).unwrap().join("_v_images/a.png").unwrap();
        assert_eq!(joined.to_file_path().unwrap(), notes.join("_v_images").join("a.png"));
    }

    #[test]
    fn test_local_url_format() {
        let location = Location::LocalFile(PathBuf::from("/home/me/notes"));
        assert_eq!(location.to_url(), "file:///home/me/notes/");
    }
}
