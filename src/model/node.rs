//! Document node types and kinds.

/// Unique identifier for a node within a [`Document`](super::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node ID (always 0).
    pub const ROOT: NodeId = NodeId(0);
}

/// Structural kind of a node.
///
/// The set is closed: every element the converter treats specially has its
/// own variant, and everything else collapses into [`NodeKind::Other`], whose
/// text is still extracted but never given special formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Synthetic document root. Its single child is the source's root element.
    #[default]
    Root,
    /// Top-level division; becomes a directory with an intro page.
    Chapter,
    /// Titled division; a direct chapter child becomes its own page,
    /// deeper ones are rendered inline as sub-headings.
    Section,
    /// Title of the enclosing chapter or section.
    Title,
    /// Paragraph block.
    Para,
    /// Bulleted list container.
    ItemizedList,
    /// Entry of an itemized list.
    ListItem,
    /// Inline emphasis span. Informational only, never re-rendered as bold/italic.
    Emphasis,
    /// Forced line break.
    LineBreak,
    /// Any other element.
    Other,
}

impl NodeKind {
    /// Map an element's local name (namespace prefix already stripped) to a kind.
    pub fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"chapter" => NodeKind::Chapter,
            b"section" => NodeKind::Section,
            b"title" => NodeKind::Title,
            b"para" | b"simpara" => NodeKind::Para,
            b"itemizedlist" => NodeKind::ItemizedList,
            b"listitem" => NodeKind::ListItem,
            b"emphasis" => NodeKind::Emphasis,
            b"linebreak" | b"sbr" => NodeKind::LineBreak,
            _ => NodeKind::Other,
        }
    }
}

/// Range into the document's shared text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    /// Byte offset into the buffer.
    pub start: u32,
    /// Length in bytes.
    pub len: u32,
}

impl TextRange {
    /// Create a new text range.
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Check if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the end offset.
    pub fn end(&self) -> u32 {
        self.start + self.len
    }
}

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Parent node (None for root).
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Text before the first child element.
    pub text: TextRange,
    /// Text after this node's closing tag, before the next sibling.
    pub tail: TextRange,
}

impl Node {
    /// Create a new node with no text and no links.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            text: TextRange::default(),
            tail: TextRange::default(),
        }
    }
}
