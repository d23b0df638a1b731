//! DocBook source reading.
//!
//! Turns a DocBook XML file (as published, for example, for the BSI
//! IT-Grundschutz compendium) into a [`Document`] tree. This is the only
//! fatal stage of a run: if the source cannot be read or parsed, no pages
//! are written.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::{Document, NodeKind};
use crate::util::decode_text;

mod parser;

pub use parser::parse_document;

/// Decode raw source bytes and parse them.
pub fn read_document(bytes: &[u8]) -> Result<Document> {
    let text = decode_text(bytes);
    parse_document(&text)
}

/// Read and parse a DocBook file from disk.
pub fn open_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let doc = read_document(&bytes)?;
    log::info!(
        "Parsed {} ({} chapters, {} sections)",
        path.display(),
        doc.chapters().count(),
        doc.iter_dfs()
            .filter(|&id| doc.kind(id) == Some(NodeKind::Section))
            .count()
    );
    Ok(doc)
}
