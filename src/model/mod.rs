//! In-memory document tree.
//!
//! A [`Document`] is the read-only input of the converter: a tree of
//! [`Node`]s with a [`NodeKind`], stored in a single vector and linked with
//! parent / first-child / next-sibling pointers. Node text and tail text are
//! ranges into one shared buffer.
//!
//! # Example
//!
//! ```
//! use docwiki::model::{Document, NodeId, NodeKind};
//!
//! let mut doc = Document::new();
//! let chapter = doc.push(NodeId::ROOT, NodeKind::Chapter, "");
//! doc.push(chapter, NodeKind::Title, "Einführung");
//!
//! assert_eq!(doc.chapters().count(), 1);
//! assert_eq!(doc.title_of(chapter).map(|t| doc.text_of(t)), Some("Einführung"));
//! ```

mod node;

pub use node::{Node, NodeId, NodeKind, TextRange};

/// A parsed document tree.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes in the tree (index 0 is always the root).
    nodes: Vec<Node>,
    /// Shared text buffer (nodes reference ranges into this).
    text: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document with a root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root)],
            text: String::new(),
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Get the number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Kind of a node, `None` for an unknown ID.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    /// Allocate a new detached node and return its ID.
    pub fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append text to the shared buffer and return the range.
    pub fn append_text(&mut self, text: &str) -> TextRange {
        let start = self.text.len() as u32;
        self.text.push_str(text);
        TextRange::new(start, text.len() as u32)
    }

    /// Get text from a range.
    pub fn text(&self, range: TextRange) -> &str {
        let start = range.start as usize;
        let end = range.end() as usize;
        self.text.get(start..end).unwrap_or("")
    }

    /// Direct text of a node (before its first child).
    pub fn text_of(&self, id: NodeId) -> &str {
        self.node(id).map(|n| self.text(n.text)).unwrap_or("")
    }

    /// Tail text of a node (after it, before its next sibling).
    pub fn tail_of(&self, id: NodeId) -> &str {
        self.node(id).map(|n| self.text(n.tail)).unwrap_or("")
    }

    /// Append more direct text to a node.
    ///
    /// Text is only contiguous in the buffer while nothing else has been
    /// appended since, so non-adjacent pieces are copied into a fresh range.
    pub fn extend_text(&mut self, id: NodeId, text: &str) {
        let Some(current) = self.node(id).map(|n| n.text) else {
            return;
        };
        let range = self.extend_range(current, text);
        if let Some(node) = self.node_mut(id) {
            node.text = range;
        }
    }

    /// Append more tail text to a node.
    pub fn extend_tail(&mut self, id: NodeId, text: &str) {
        let Some(current) = self.node(id).map(|n| n.tail) else {
            return;
        };
        let range = self.extend_range(current, text);
        if let Some(node) = self.node_mut(id) {
            node.tail = range;
        }
    }

    fn extend_range(&mut self, current: TextRange, text: &str) -> TextRange {
        if current.is_empty() {
            return self.append_text(text);
        }
        if current.end() as usize == self.text.len() {
            self.text.push_str(text);
            return TextRange::new(current.start, current.len + text.len() as u32);
        }
        let mut joined = self.text(current).to_string();
        joined.push_str(text);
        self.append_text(&joined)
    }

    /// Append a child node to a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(child).is_none() {
            return;
        }
        let Some(last) = self.node(parent).map(|n| n.last_child) else {
            return;
        };

        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
            child_node.next_sibling = None;
        }

        match last {
            Some(last) => {
                if let Some(last_node) = self.node_mut(last) {
                    last_node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(parent_node) = self.node_mut(parent) {
                    parent_node.first_child = Some(child);
                }
            }
        }

        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.last_child = Some(child);
        }
    }

    /// Allocate a node of `kind` with direct `text`, append it to `parent`,
    /// and return its ID.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, text: &str) -> NodeId {
        let mut node = Node::new(kind);
        if !text.is_empty() {
            node.text = self.append_text(text);
        }
        let id = self.alloc_node(node);
        self.append_child(parent, id);
        id
    }

    /// Set the tail text of a node, replacing any previous tail.
    pub fn set_tail(&mut self, id: NodeId, tail: &str) {
        let range = self.append_text(tail);
        if let Some(node) = self.node_mut(id) {
            node.tail = range;
        }
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        let first_child = self.node(parent).and_then(|n| n.first_child);
        ChildIter {
            doc: self,
            current: first_child,
        }
    }

    /// Iterate over the direct children of `parent` that have the given kind.
    pub fn children_of_kind(
        &self,
        parent: NodeId,
        kind: NodeKind,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(move |&id| self.kind(id) == Some(kind))
    }

    /// First direct `title` child of a node.
    pub fn title_of(&self, id: NodeId) -> Option<NodeId> {
        self.children_of_kind(id, NodeKind::Title).next()
    }

    /// Chapters in document order.
    ///
    /// Chapters directly below the root are yielded as-is; for any other
    /// top-level element (e.g. `<book>`), its chapter children are yielded.
    pub fn chapters(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children(NodeId::ROOT).flat_map(move |top| {
            let direct = (self.kind(top) == Some(NodeKind::Chapter)).then_some(top);
            let nested = (self.kind(top) != Some(NodeKind::Chapter))
                .then(|| self.children_of_kind(top, NodeKind::Chapter))
                .into_iter()
                .flatten();
            direct.into_iter().chain(nested)
        })
    }

    /// Iterate over all nodes in depth-first order.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        DfsIter {
            doc: self,
            stack: vec![NodeId::ROOT],
        }
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    doc: &'a Document,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Depth-first iterator over all nodes.
pub struct DfsIter<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<NodeId> = self.doc.children(current).collect();
        children.reverse();
        self.stack.extend(children);

        Some(current)
    }
}
