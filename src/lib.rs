//! # docwiki
//!
//! Converts a DocBook XML document into a DokuWiki page corpus and
//! cross-links the pages by their headings.
//!
//! ## Pipeline
//!
//! 1. [`open_document`] parses the DocBook source into a [`Document`] tree
//! 2. [`build_corpus`] writes one namespace per chapter: a `start` page with
//!    the chapter's own paragraphs plus one page per section
//! 3. [`index_corpus`] maps every page's top-level heading to its page ID
//! 4. [`link_corpus`] turns mentions of indexed headings into wiki links
//!
//! Steps 3 and 4 are separate passes; linking always sees the complete index.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docwiki::{
//!     BuildConfig, CorpusStore, LinkConfig, build_corpus, index_corpus, link_corpus,
//!     open_document,
//! };
//!
//! let doc = open_document("kompendium.xml").unwrap();
//! build_corpus(&doc, "pages", BuildConfig::default());
//!
//! let store = CorpusStore::new("pages");
//! let indexed = index_corpus(&store).unwrap();
//! indexed.index.save("indexed_pages.csv").unwrap();
//! link_corpus(&store, &indexed.index, &LinkConfig::default()).unwrap();
//! ```
//!
//! ## Rendering without the filesystem
//!
//! ```
//! use docwiki::docbook::parse_document;
//! use docwiki::CorpusBuilder;
//!
//! let doc = parse_document(
//!     "<book><chapter><title>Einführung</title><para>Hallo</para></chapter></book>",
//! ).unwrap();
//! let built = CorpusBuilder::new().build(&doc);
//!
//! assert_eq!(built.pages[0].id().as_str(), "einfuehrung:start");
//! assert_eq!(built.pages[0].body, "Hallo\n\n");
//! ```

pub mod corpus;
pub mod docbook;
pub mod error;
pub mod model;
pub(crate) mod util;
pub mod wiki;
pub mod xref;

pub use corpus::{
    BuildConfig, BuildReport, CorpusBuilder, CorpusStore, Page, PageFailure, PageId, build_corpus,
};
pub use docbook::{open_document, parse_document, read_document};
pub use error::{Error, Result};
pub use model::{Document, NodeId, NodeKind};
pub use xref::{
    CrossRefIndex, IndexEntry, LinkConfig, LinkReport, Linker, MatchMode, cross_link,
    index_corpus, link_corpus,
};
