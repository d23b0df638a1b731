//! DokuWiki heading markers.
//!
//! DokuWiki inverts the usual level numbering: `====== T ======` (six
//! markers) is the top-level heading and `== T ==` the lowest.

use std::sync::LazyLock;

use regex::Regex;

/// Heading marker character.
pub const MARKER: char = '=';

/// Widest marker run, used for depth-1 sections.
pub const MAX_WIDTH: usize = 6;

/// A top-level heading: at least five markers on both sides.
static TOP_LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^={5,}(.+?)={5,}$").unwrap());

/// Any heading: at least two markers on both sides.
static ANY_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^={2,}.*={2,}$").unwrap());

/// Marker width for a section at `depth` (1 = direct chapter child).
///
/// `depth 1 → 6`, `depth 2 → 5`, … floored at 1 from depth 6 on. Depth 0 is
/// treated like depth 1.
pub fn heading_width(depth: usize) -> usize {
    (MAX_WIDTH + 1).saturating_sub(depth.max(1)).max(1)
}

/// Format a heading line (without trailing newline).
pub fn heading_line(title: &str, depth: usize) -> String {
    let markers: String = std::iter::repeat_n(MARKER, heading_width(depth)).collect();
    format!("{markers} {title} {markers}")
}

/// Text of a top-level heading line, trimmed; `None` for any other line.
pub fn top_level_heading(line: &str) -> Option<&str> {
    TOP_LEVEL_RE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|text| !text.is_empty())
}

/// Whether a line is a heading of any level.
pub fn is_heading_line(line: &str) -> bool {
    ANY_HEADING_RE.is_match(line.trim())
}
