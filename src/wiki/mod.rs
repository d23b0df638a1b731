//! Pure DokuWiki markup generation from a document tree.
//!
//! Nothing here touches the filesystem:
//!
//! - [`slugify`]: title → page/namespace name
//! - [`extract`]: mixed-content text extraction
//! - [`render`]: section and chapter-intro markup
//! - [`heading`]: heading marker widths and heading-line detection
//!
//! The corpus layer ([`crate::corpus`]) decides which nodes become pages and
//! writes them out.
//!
//! ## Markup conventions
//!
//! - Headings use `=` runs, widest (`======`) for the top level
//! - Paragraphs are separated by a blank line
//! - List entries are `  * text`, one line each, followed by a blank line
//! - Emphasis is not marked up; its text is kept with surrounding spaces

pub mod extract;
pub mod heading;
pub mod render;
pub mod slugify;

pub use extract::{TextExtractor, extract_text};
pub use heading::{heading_line, heading_width, is_heading_line, top_level_heading};
pub use render::{SectionRenderer, render_section};
pub use slugify::{disambiguate, slugify};
