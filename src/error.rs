//! Error types for docwiki operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a source document or maintaining a corpus.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Cross-reference pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Malformed index at line {line}: {message}")]
    IndexFormat { line: usize, message: String },

    #[error("Not a corpus page: {}", .0.display())]
    PagePath(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
