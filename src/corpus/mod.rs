//! Page corpus generation.
//!
//! [`CorpusBuilder`] turns a [`Document`] into [`Page`]s without touching
//! the filesystem; [`CorpusStore`] persists them as
//! `<root>/<chapter>/<section>.txt` plus `<root>/<chapter>/start.txt`.

use std::path::PathBuf;

use crate::model::Document;

mod builder;
mod page;
mod store;

pub use builder::{BuildConfig, BuiltCorpus, CorpusBuilder, SlugCollision};
pub use page::{DELIMITER, Page, PageId};
pub use store::{CorpusStore, write_atomic};

/// A page that could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of writing a corpus.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub pages_written: usize,
    pub collisions: Vec<SlugCollision>,
    pub failures: Vec<PageFailure>,
}

/// Render `doc` and write every page below `root`.
///
/// A page that fails to write is logged and reported; the remaining pages
/// are still written.
pub fn build_corpus(
    doc: &Document,
    root: impl Into<PathBuf>,
    config: BuildConfig,
) -> BuildReport {
    let store = CorpusStore::new(root).with_extension(config.extension.clone());
    let built = CorpusBuilder::with_config(config).build(doc);

    let mut report = BuildReport {
        collisions: built.collisions,
        ..Default::default()
    };

    for page in &built.pages {
        match store.write_page(page) {
            Ok(path) => {
                log::debug!("Wrote {}", path.display());
                report.pages_written += 1;
            }
            Err(e) => {
                let path = store.page_path(page);
                log::warn!("Failed to write {}: {e}", path.display());
                report.failures.push(PageFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Wrote {} pages to {} ({} failed)",
        report.pages_written,
        store.root().display(),
        report.failures.len()
    );
    report
}
