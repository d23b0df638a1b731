//! Corpus-wide cross-referencing.
//!
//! Linking is two passes over a written corpus. [`index_corpus`] collects
//! every page's top-level heading; only once that index is complete does
//! [`link_corpus`] rewrite page bodies, so a page is never linked against
//! a partial index.

mod index;
mod link;

use std::path::PathBuf;

pub use index::{CrossRefIndex, HEADER, IndexEntry, IndexReport, first_heading, index_corpus};
pub use link::{LinkConfig, LinkReport, Linker, MatchMode, link_markup, link_corpus};

use crate::corpus::CorpusStore;
use crate::error::Result;

/// Index and then link the corpus below `root`.
pub fn cross_link(
    root: impl Into<PathBuf>,
    config: &LinkConfig,
) -> Result<(IndexReport, LinkReport)> {
    let store = CorpusStore::new(root).with_extension(config.extension.clone());
    let indexed = index_corpus(&store)?;
    let linked = link_corpus(&store, &indexed.index, config)?;
    Ok((indexed, linked))
}
