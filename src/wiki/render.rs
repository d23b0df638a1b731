//! Section → DokuWiki markup rendering.
//!
//! Pure string generation; writing pages to disk is the corpus layer's job.
//! Block order inside a section is fixed: heading, paragraphs, lists, then
//! nested sections, each group in document order.

use crate::model::{Document, NodeId, NodeKind};

use super::extract::{DEFAULT_MAX_DEPTH, TextExtractor};
use super::heading::heading_line;

/// Bullet prefix for itemized list entries.
pub const BULLET: &str = "  * ";

/// Renders sections and chapter introductions.
#[derive(Debug, Clone, Copy)]
pub struct SectionRenderer<'a> {
    doc: &'a Document,
    extractor: TextExtractor<'a>,
    max_depth: usize,
}

impl<'a> SectionRenderer<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            extractor: TextExtractor::new(doc),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit both section nesting and inline text nesting.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self.extractor = self.extractor.with_max_depth(max_depth);
        self
    }

    /// Render a section and all its subsections.
    ///
    /// `depth` is 1 for a direct chapter child. A section without title,
    /// paragraphs, lists or subsections renders to an empty string.
    pub fn render(&self, section: NodeId, depth: usize) -> String {
        let mut out = String::new();
        self.render_into(section, depth, &mut out);
        out
    }

    fn render_into(&self, section: NodeId, depth: usize, out: &mut String) {
        if depth > self.max_depth {
            log::warn!(
                "Sections nested deeper than {} levels, skipping node {}",
                self.max_depth,
                section.0
            );
            return;
        }

        if let Some(title) = self.title_text(section) {
            out.push_str(&heading_line(&title, depth));
            out.push_str("\n\n");
        }

        for para in self.doc.children_of_kind(section, NodeKind::Para) {
            out.push_str(&self.extractor.extract(para));
            out.push_str("\n\n");
        }

        for list in self.doc.children_of_kind(section, NodeKind::ItemizedList) {
            self.render_list(list, out);
        }

        for subsection in self.doc.children_of_kind(section, NodeKind::Section) {
            self.render_into(subsection, depth + 1, out);
        }
    }

    fn render_list(&self, list: NodeId, out: &mut String) {
        for item in self.doc.children_of_kind(list, NodeKind::ListItem) {
            let text = single_line(&self.extractor.extract(item));
            if !text.is_empty() {
                out.push_str(BULLET);
                out.push_str(&text);
                out.push('\n');
            }
        }
        out.push('\n');
    }

    /// Body of a chapter's intro page: its direct paragraphs only.
    pub fn render_intro(&self, chapter: NodeId) -> String {
        let mut out = String::new();
        for para in self.doc.children_of_kind(chapter, NodeKind::Para) {
            out.push_str(&self.extractor.extract(para));
            out.push_str("\n\n");
        }
        out
    }

    /// Title of a chapter or section on a single line, if it has a non-blank one.
    pub fn title_text(&self, node: NodeId) -> Option<String> {
        let title = self.doc.title_of(node)?;
        let text = single_line(&self.extractor.extract(title));
        (!text.is_empty()).then_some(text)
    }
}

/// Render a section with default limits.
pub fn render_section(doc: &Document, section: NodeId, depth: usize) -> String {
    SectionRenderer::new(doc).render(section, depth)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(doc: &mut Document, parent: NodeId, title: &str) -> NodeId {
        let s = doc.push(parent, NodeKind::Section, "");
        doc.push(s, NodeKind::Title, title);
        s
    }

    #[test]
    fn test_heading_and_paragraph() {
        let mut doc = Document::new();
        let s = section(&mut doc, NodeId::ROOT, "Übersicht");
        doc.push(s, NodeKind::Para, "Hallo Welt.");

        assert_eq!(
            render_section(&doc, s, 1),
            "====== Übersicht ======\n\nHallo Welt.\n\n"
        );
    }

    #[test]
    fn test_empty_section_renders_nothing() {
        let mut doc = Document::new();
        let s = doc.push(NodeId::ROOT, NodeKind::Section, "");
        assert_eq!(render_section(&doc, s, 1), "");
    }

    #[test]
    fn test_list_items() {
        let mut doc = Document::new();
        let s = doc.push(NodeId::ROOT, NodeKind::Section, "");
        let list = doc.push(s, NodeKind::ItemizedList, "");
        let first = doc.push(list, NodeKind::ListItem, "");
        doc.push(first, NodeKind::Para, "Erstens");
        doc.push(list, NodeKind::ListItem, "   ");
        let third = doc.push(list, NodeKind::ListItem, "");
        doc.push(third, NodeKind::Para, "Drittens,");
        doc.push(third, NodeKind::Para, "mehrzeilig");

        assert_eq!(
            render_section(&doc, s, 1),
            "  * Erstens\n  * Drittens, mehrzeilig\n\n"
        );
    }

    #[test]
    fn test_block_groups_follow_fixed_order() {
        let mut doc = Document::new();
        let s = doc.push(NodeId::ROOT, NodeKind::Section, "");
        let list = doc.push(s, NodeKind::ItemizedList, "");
        doc.push(list, NodeKind::ListItem, "Punkt");
        doc.push(s, NodeKind::Para, "Absatz");
        doc.push(s, NodeKind::Title, "Titel");

        assert_eq!(
            render_section(&doc, s, 2),
            "===== Titel =====\n\nAbsatz\n\n  * Punkt\n\n"
        );
    }

    #[test]
    fn test_nested_sections_narrow_the_heading() {
        let mut doc = Document::new();
        let top = section(&mut doc, NodeId::ROOT, "A");
        let mid = section(&mut doc, top, "B");
        section(&mut doc, mid, "C");
        section(&mut doc, top, "D");

        assert_eq!(
            render_section(&doc, top, 1),
            "====== A ======\n\n===== B =====\n\n==== C ====\n\n===== D =====\n\n"
        );
    }

    #[test]
    fn test_title_with_inline_markup_stays_on_one_line() {
        let mut doc = Document::new();
        let s = doc.push(NodeId::ROOT, NodeKind::Section, "");
        let title = doc.push(s, NodeKind::Title, "Schutz vor");
        let em = doc.push(title, NodeKind::Emphasis, "Schadsoftware");
        doc.set_tail(em, "\n  (Malware)");

        assert_eq!(
            render_section(&doc, s, 1),
            "====== Schutz vor Schadsoftware (Malware) ======\n\n"
        );
    }

    #[test]
    fn test_section_depth_limit() {
        let mut doc = Document::new();
        let top = section(&mut doc, NodeId::ROOT, "A");
        let mid = section(&mut doc, top, "B");
        section(&mut doc, mid, "C");

        let renderer = SectionRenderer::new(&doc).with_max_depth(2);
        assert_eq!(
            renderer.render(top, 1),
            "====== A ======\n\n===== B =====\n\n"
        );
    }

    #[test]
    fn test_intro_excludes_sections() {
        let mut doc = Document::new();
        let chapter = doc.push(NodeId::ROOT, NodeKind::Chapter, "");
        doc.push(chapter, NodeKind::Title, "Kapitel");
        doc.push(chapter, NodeKind::Para, "Einleitung.");
        let s = section(&mut doc, chapter, "Teil");
        doc.push(s, NodeKind::Para, "Nicht im Intro.");

        let renderer = SectionRenderer::new(&doc);
        assert_eq!(renderer.render_intro(chapter), "Einleitung.\n\n");
    }
}
