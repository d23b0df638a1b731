//! Cross-reference substitution.
//!
//! Rewrites occurrences of indexed headings in page text into DokuWiki
//! links `[[page:id|Heading]]`. Heading lines and existing links are left
//! alone, so linking an already linked corpus changes nothing.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::corpus::{CorpusStore, PageFailure, PageId};
use crate::error::Result;
use crate::wiki::is_heading_line;

use super::index::CrossRefIndex;

/// An existing `[[...]]` link.
static EXISTING_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[.*?\]\]").unwrap());

/// How heading text must sit in a line to be linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Only link occurrences not glued to letters or digits, so `Risk`
    /// does not match inside `Risks`.
    #[default]
    WordBoundary,
    /// Link every literal occurrence, even inside longer words.
    Substring,
}

/// Configuration for [`link_corpus`].
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub match_mode: MatchMode,
    /// Page file extension (without the dot).
    pub extension: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            extension: "txt".to_string(),
        }
    }
}

impl LinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// Format a link to `page` labelled `text`.
pub fn link_markup(page: &PageId, text: &str) -> String {
    format!("[[{page}|{text}]]")
}

/// Substitutes indexed headings with links.
///
/// Built once from a complete index; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Linker {
    /// Alternation of all headings, longest first.
    pattern: Option<Regex>,
    /// Headings longest first, for boundary fallback.
    headings: Vec<String>,
    targets: HashMap<String, PageId>,
    mode: MatchMode,
}

impl Linker {
    pub fn new(index: &CrossRefIndex, mode: MatchMode) -> Result<Self> {
        let targets: HashMap<String, PageId> = index
            .targets()
            .into_iter()
            .map(|(heading, page)| (heading.to_string(), page.clone()))
            .collect();

        let mut headings: Vec<String> = targets.keys().cloned().collect();
        headings.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let pattern = if headings.is_empty() {
            None
        } else {
            let alternation = headings
                .iter()
                .map(|h| regex::escape(h))
                .collect::<Vec<_>>()
                .join("|");
            Some(RegexBuilder::new(&alternation).size_limit(1 << 26).build()?)
        };

        Ok(Self {
            pattern,
            headings,
            targets,
            mode,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Link a whole page body, line by line. Returns the new body and the
    /// number of links inserted.
    pub fn link_text(&self, body: &str) -> (String, usize) {
        let mut out = String::with_capacity(body.len());
        let mut count = 0;
        for line in body.split_inclusive('\n') {
            let (linked, n) = self.link_line(line);
            out.push_str(&linked);
            count += n;
        }
        (out, count)
    }

    /// Link one line. Heading lines are returned unchanged.
    pub fn link_line(&self, line: &str) -> (String, usize) {
        if self.pattern.is_none() || is_heading_line(line) {
            return (line.to_string(), 0);
        }

        let mut out = String::with_capacity(line.len());
        let mut count = 0;
        let mut last = 0;
        for existing in EXISTING_LINK_RE.find_iter(line) {
            count += self.link_segment(&line[last..existing.start()], &mut out);
            out.push_str(existing.as_str());
            last = existing.end();
        }
        count += self.link_segment(&line[last..], &mut out);
        (out, count)
    }

    fn link_segment(&self, segment: &str, out: &mut String) -> usize {
        let Some(pattern) = &self.pattern else {
            out.push_str(segment);
            return 0;
        };

        let mut count = 0;
        let mut last = 0;
        let mut pos = 0;
        while pos < segment.len() {
            let Some(m) = pattern.find_at(segment, pos) else {
                break;
            };
            let start = m.start();

            let heading = match self.mode {
                MatchMode::Substring => Some(m.as_str()),
                MatchMode::WordBoundary => self.bounded_match_at(segment, start),
            };

            match heading {
                Some(heading) => {
                    let end = start + heading.len();
                    out.push_str(&segment[last..start]);
                    if let Some(page) = self.targets.get(heading) {
                        log::trace!("Linking {heading:?} to {page}");
                        out.push_str(&link_markup(page, heading));
                        count += 1;
                    } else {
                        out.push_str(heading);
                    }
                    last = end;
                    pos = end;
                }
                None => {
                    pos = start + segment[start..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }
        out.push_str(&segment[last..]);
        count
    }

    /// Longest heading starting at `start` whose edges are word boundaries.
    fn bounded_match_at<'s>(&'s self, segment: &str, start: usize) -> Option<&'s str> {
        let rest = &segment[start..];
        let before = segment[..start].chars().next_back();
        self.headings
            .iter()
            .filter(|h| rest.starts_with(h.as_str()))
            .find(|h| {
                let after = rest[h.len()..].chars().next();
                edge_ok(h.chars().next(), before) && edge_ok(h.chars().next_back(), after)
            })
            .map(String::as_str)
    }
}

/// A word character at the heading's edge must not touch another one.
fn edge_ok(edge: Option<char>, neighbour: Option<char>) -> bool {
    match (edge, neighbour) {
        (Some(e), Some(n)) if e.is_alphanumeric() => !n.is_alphanumeric(),
        _ => true,
    }
}

/// Outcome of linking a corpus.
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub pages_rewritten: usize,
    pub pages_unchanged: usize,
    pub links_inserted: usize,
    pub failures: Vec<PageFailure>,
}

/// Link every page of `store` against a complete `index`.
///
/// Each page is rewritten atomically. A page that cannot be read or
/// written is logged, reported and left as it was.
pub fn link_corpus(
    store: &CorpusStore,
    index: &CrossRefIndex,
    config: &LinkConfig,
) -> Result<LinkReport> {
    let linker = Linker::new(index, config.match_mode)?;
    let mut report = LinkReport::default();

    for path in store.list_pages()? {
        let body = match store.read_page(&path) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                report.failures.push(PageFailure {
                    path,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let (linked, count) = linker.link_text(&body);
        if linked == body {
            report.pages_unchanged += 1;
            continue;
        }

        match store.replace_page(&path, &linked) {
            Ok(()) => {
                log::debug!("Inserted {count} links into {}", path.display());
                report.pages_rewritten += 1;
                report.links_inserted += count;
            }
            Err(e) => {
                log::warn!("Failed to rewrite {}: {e}", path.display());
                report.failures.push(PageFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Linked {} headings: {} pages rewritten, {} links, {} failed",
        index.len(),
        report.pages_rewritten,
        report.links_inserted,
        report.failures.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xref::IndexEntry;

    fn index(entries: &[(&str, &str)]) -> CrossRefIndex {
        let mut index = CrossRefIndex::new();
        for (page, heading) in entries {
            index.push(IndexEntry::new(PageId::new(*page), *heading));
        }
        index
    }

    fn linker(entries: &[(&str, &str)], mode: MatchMode) -> Linker {
        Linker::new(&index(entries), mode).unwrap()
    }

    #[test]
    fn test_heading_line_is_untouched() {
        let l = linker(&[("a:risk", "Risk Management")], MatchMode::WordBoundary);
        let body = "====== Risk Management ======";
        assert_eq!(l.link_text(body), (body.to_string(), 0));

        let sub = "=== Risk Management im Detail ===\n";
        assert_eq!(l.link_text(sub).0, sub);
    }

    #[test]
    fn test_body_text_is_linked() {
        let l = linker(&[("a:risk", "Risk Management")], MatchMode::WordBoundary);
        assert_eq!(
            l.link_text("See Risk Management for details."),
            ("See [[a:risk|Risk Management]] for details.".to_string(), 1)
        );
    }

    #[test]
    fn test_longest_heading_wins() {
        let l = linker(
            &[("b:risk", "Risk"), ("a:rm", "Risk Management")],
            MatchMode::Substring,
        );
        assert_eq!(
            l.link_text("Risk Management and Risk.").0,
            "[[a:rm|Risk Management]] and [[b:risk|Risk]]."
        );
    }

    #[test]
    fn test_word_boundary_mode() {
        let l = linker(&[("b:risk", "Risk")], MatchMode::WordBoundary);
        assert_eq!(l.link_text("Risks and Risk").0, "Risks and [[b:risk|Risk]]");

        let l = linker(&[("b:risk", "Risk")], MatchMode::Substring);
        assert_eq!(
            l.link_text("Risks and Risk").0,
            "[[b:risk|Risk]]s and [[b:risk|Risk]]"
        );
    }

    #[test]
    fn test_boundary_falls_back_to_shorter_heading() {
        let l = linker(
            &[("b:risk", "Risk"), ("a:rm", "Risk Management")],
            MatchMode::WordBoundary,
        );
        assert_eq!(
            l.link_text("Risk Managements").0,
            "[[b:risk|Risk]] Managements"
        );
    }

    #[test]
    fn test_non_word_edges_need_no_boundary() {
        let l = linker(&[("a:c", "C++")], MatchMode::WordBoundary);
        assert_eq!(l.link_text("Use C++.").0, "Use [[a:c|C++]].");
    }

    #[test]
    fn test_existing_links_are_preserved() {
        let l = linker(
            &[("b:risk", "Risk"), ("a:rm", "Risk Management")],
            MatchMode::Substring,
        );
        let once = l.link_text("Risk Management, Risk\n").0;
        let twice = l.link_text(&once).0;
        assert_eq!(once, "[[a:rm|Risk Management]], [[b:risk|Risk]]\n");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_duplicate_headings_use_last_entry() {
        let l = linker(&[("a:one", "Dup"), ("b:two", "Dup")], MatchMode::WordBoundary);
        assert_eq!(l.link_text("Dup").0, "[[b:two|Dup]]");
    }

    #[test]
    fn test_line_endings_survive() {
        let l = linker(&[("a:x", "Wort")], MatchMode::WordBoundary);
        assert_eq!(
            l.link_text("ein Wort\r\nzwei\n\n").0,
            "ein [[a:x|Wort]]\r\nzwei\n\n"
        );
    }

    #[test]
    fn test_unicode_neighbours() {
        let l = linker(&[("a:x", "Maß")], MatchMode::WordBoundary);
        assert_eq!(l.link_text("Maßnahme, Maß.").0, "Maßnahme, [[a:x|Maß]].");
    }

    #[test]
    fn test_empty_index_is_noop() {
        let l = linker(&[], MatchMode::WordBoundary);
        assert!(l.is_empty());
        assert_eq!(l.link_text("anything"), ("anything".to_string(), 0));
    }
}
