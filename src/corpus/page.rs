//! Pages and page identifiers.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Delimiter between namespace segments in a page ID.
pub const DELIMITER: char = ':';

/// A DokuWiki page ID such as `einfuehrung:uebersicht`.
///
/// The ID is the page path relative to the corpus root, extension removed,
/// with path separators replaced by [`DELIMITER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(String);

impl PageId {
    /// Join already-sanitized segments.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let joined = segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(&DELIMITER.to_string());
        Self(joined)
    }

    /// ID of a page file at `relative` (below the corpus root).
    ///
    /// Returns `None` unless the path is relative, has only normal
    /// components and ends in `.{extension}`.
    pub fn from_relative_path(relative: &Path, extension: &str) -> Option<Self> {
        if relative.extension()?.to_str()? != extension {
            return None;
        }
        let stem = relative.with_extension("");
        let mut segments = Vec::new();
        for component in stem.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_str()?.to_string()),
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self::from_segments(&segments))
    }

    /// Wrap an ID read back from an index artifact.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(DELIMITER)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One generated wiki page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Sanitized path segments, directory first, page name last.
    pub segments: Vec<String>,
    /// DokuWiki markup.
    pub body: String,
}

impl Page {
    pub fn new(segments: Vec<String>, body: String) -> Self {
        Self { segments, body }
    }

    pub fn id(&self) -> PageId {
        PageId::from_segments(&self.segments)
    }

    /// Path of the page file relative to the corpus root.
    ///
    /// Slugs may contain dots, so the extension is appended rather than set.
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        let mut path = PathBuf::new();
        if let Some((name, dirs)) = self.segments.split_last() {
            path.extend(dirs);
            path.push(format!("{name}.{extension}"));
        }
        path
    }
}
