//! Mixed-content text extraction.
//!
//! DocBook paragraphs interleave character data with inline elements, so a
//! node's readable text is assembled in source order: the node's own text,
//! then for every child the child's content followed by the child's tail.

use crate::model::{Document, NodeId, NodeKind};

/// Default recursion limit for [`TextExtractor`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Extracts plain text from document nodes.
#[derive(Debug, Clone, Copy)]
pub struct TextExtractor<'a> {
    doc: &'a Document,
    max_depth: usize,
}

impl<'a> TextExtractor<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Stop descending below `max_depth` levels of nesting.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Plain text of `id`. Unknown IDs yield an empty string.
    pub fn extract(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.extract_into(id, 0, &mut out);
        out
    }

    fn extract_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.doc.node(id) else {
            return;
        };
        if depth > self.max_depth {
            log::warn!(
                "Nesting deeper than {} levels below node {}, text dropped",
                self.max_depth,
                id.0
            );
            return;
        }

        out.push_str(self.doc.text(node.text).trim());

        for child in self.doc.children(id) {
            match self.doc.kind(child) {
                Some(NodeKind::Emphasis) => {
                    // Spaces keep the emphasized words from fusing with neighbours.
                    let mut inner = String::new();
                    self.extract_into(child, depth + 1, &mut inner);
                    let inner = inner.trim();
                    if !inner.is_empty() {
                        out.push(' ');
                        out.push_str(inner);
                        out.push(' ');
                    }
                }
                Some(NodeKind::LineBreak) => out.push('\n'),
                Some(NodeKind::Para) => {
                    self.extract_into(child, depth + 1, out);
                    out.push_str("\n\n");
                }
                _ => self.extract_into(child, depth + 1, out),
            }

            out.push_str(self.doc.tail_of(child).trim());
        }
    }
}

/// Plain text of `id` with the default depth limit.
pub fn extract_text(doc: &Document, id: NodeId) -> String {
    TextExtractor::new(doc).extract(id)
}
