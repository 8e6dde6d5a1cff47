//! Path normalization and comparison helpers
//!
//! Paths handed to a file handle come from many places: notebook settings,
//! links inside documents, other platforms. These helpers compare them on
//! their meaning rather than on their spelling: `/` and `\` are the same
//! separator, `.` and `..` segments are folded, trailing separators are
//! ignored.

use std::path::{Path, PathBuf};

/// Prefix marking a bundled, non-native resource path (`:/docs/readme.md`)
pub const RESOURCE_PREFIX: &str = ":/";

/// Clean up a path into a canonical `/`-separated string.
///
/// Does not touch the filesystem, so symlinks are not resolved.
pub fn normalize(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");

    let (prefix, rest) = split_prefix(&text);

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // Nothing to climb out of at a root
                _ if !prefix.is_empty() => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    if parts.is_empty() {
        return if prefix.is_empty() {
            ".".to_string()
        } else {
            prefix.to_string()
        };
    }

    format!("{}{}", prefix, parts.join("/"))
}

/// Split off the part of a path that `..` cannot climb above
fn split_prefix(text: &str) -> (&str, &str) {
    if let Some(end) = scheme_end(text) {
        return text.split_at(end);
    }
    if text.starts_with(RESOURCE_PREFIX) {
        return text.split_at(RESOURCE_PREFIX.len());
    }
    // Drive letter: "C:/"
    let bytes = text.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && &bytes[1..3] == b":/" {
        return text.split_at(3);
    }
    if text.starts_with('/') {
        return text.split_at(1);
    }
    ("", text)
}

/// Byte offset just past `scheme://`, if the text starts with one
fn scheme_end(text: &str) -> Option<usize> {
    let colon = text.find("://")?;
    let scheme = &text[..colon];
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && scheme.len() > 1;
    valid.then_some(colon + 3)
}

/// Directory that contains `path`
pub fn base_path_of(path: &Path) -> PathBuf {
    let cleaned = normalize(path);

    match cleaned.rfind('/') {
        Some(0) => PathBuf::from("/"),
        // ":/name" or "C:/name" keep their root separator
        Some(idx) if cleaned[..idx].ends_with(':') => PathBuf::from(&cleaned[..=idx]),
        Some(idx) => PathBuf::from(&cleaned[..idx]),
        None => PathBuf::from("."),
    }
}

/// Compare two paths after normalization; case-insensitive on Windows
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    if cfg!(windows) {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}

/// Whether `path` names something on the native filesystem
pub fn is_native_path(path: &Path) -> bool {
    !path.to_string_lossy().starts_with(RESOURCE_PREFIX)
}

/// Resolve a folder setting against a base directory.
///
/// Absolute folders are used as given, relative ones hang off `base`.
pub fn resolve_folder(base: &Path, folder: &str) -> PathBuf {
    let folder_path = Path::new(folder);
    if folder_path.is_absolute() || !is_native_path(folder_path) {
        folder_path.to_path_buf()
    } else {
        base.join(folder_path)
    }
}
