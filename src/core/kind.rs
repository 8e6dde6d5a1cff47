//! Document and file classification

use std::fmt;
use std::path::Path;

/// Content format of a document, derived from its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentKind {
    Markdown,
    Html,
    PlainText,
    #[default]
    Unknown,
}

impl DocumentKind {
    /// Classify a file name by its suffix (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        let suffix = Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        match suffix.as_deref() {
            Some("md" | "markdown" | "mkd" | "mdown") => Self::Markdown,
            Some("html" | "htm") => Self::Html,
            Some("txt" | "text") => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    pub fn is_markdown(self) -> bool {
        self == Self::Markdown
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::PlainText => "plain text",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Role a file plays for its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A note inside a notebook directory
    Note,
    /// A document opened from outside any notebook
    Orphan,
    /// The index document of a plain folder
    OrphanFolderIndex,
}
