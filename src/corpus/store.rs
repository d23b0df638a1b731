//! On-disk page corpus.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{Error, Result};

use super::page::{Page, PageId};

/// A directory of page files.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    root: PathBuf,
    extension: String,
}

impl CorpusStore {
    /// Open a corpus rooted at `root` with the default `txt` extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "txt".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Absolute location of a page.
    pub fn page_path(&self, page: &Page) -> PathBuf {
        self.root.join(page.relative_path(&self.extension))
    }

    /// Write a page, creating its directory if needed.
    pub fn write_page(&self, page: &Page) -> Result<PathBuf> {
        let path = self.page_path(page);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        write_atomic(&path, page.body.as_bytes())?;
        Ok(path)
    }

    /// Page files below the root, depth-first in file name order.
    ///
    /// The order is stable across runs, which makes index precedence
    /// between duplicate headings reproducible. Symlinks are not followed.
    /// Unreadable entries are logged and skipped; an unreadable root is an
    /// error.
    pub fn list_pages(&self) -> Result<Vec<PathBuf>> {
        let mut pages = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(Error::Io(e.into())),
                Err(e) => {
                    log::warn!("Skipping corpus entry: {e}");
                    continue;
                }
            };
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str())
                    == Some(self.extension.as_str())
            {
                pages.push(entry.into_path());
            }
        }
        Ok(pages)
    }

    /// ID of the page stored at `path`.
    pub fn page_id(&self, path: &Path) -> Result<PageId> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| Error::PagePath(path.to_path_buf()))?;
        PageId::from_relative_path(relative, &self.extension)
            .ok_or_else(|| Error::PagePath(path.to_path_buf()))
    }

    pub fn read_page(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    /// Replace a page's content in one step.
    pub fn replace_page(&self, path: &Path, body: &str) -> Result<()> {
        write_atomic(path, body.as_bytes())?;
        Ok(())
    }
}

/// Write `contents` to `path` via a temporary file in the same directory.
///
/// Readers see either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
