//! Arena storage for the markdown tree.
//!
//! Nodes live in a single `Vec` owned by [`Document`] and refer to each other
//! through [`NodeId`] indices: parent, first child, last child and next
//! sibling. Children therefore form a singly-linked chain in document order.

use std::fmt::{self, Write};

use crate::node::{Block, Inline, NodeKind};

/// Index of a node inside its [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId(u32);

impl NodeId {
    /// Identifier of the root node.
    pub const ROOT: Self = Self(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// An immutable markdown tree.
///
/// The root is always a [`Block::Document`] node. Build one with
/// [`DocumentBuilder`] or [`crate::parse`].
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Handle to the root node.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: NodeId::ROOT,
        }
    }

    /// Handle to the node with the given id, if it exists.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { doc: self, id })
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document holds nothing but its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.nodes.len()).map(move |i| NodeRef {
            doc: self,
            id: NodeId(u32::try_from(i).unwrap_or(u32::MAX)),
        })
    }

    /// Render an indented outline of the tree, one node per line.
    ///
    /// Indentation stops growing after [`DUMP_MAX_INDENT`] levels; deeper
    /// lines carry their depth instead, so the outline stays linear in the
    /// number of nodes.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        dump_line(&mut out, 0, self.root().kind());
        let mut stack = vec![self.root().children()];
        while let Some(children) = stack.last_mut() {
            match children.next() {
                Some(child) => {
                    dump_line(&mut out, stack.len(), child.kind());
                    stack.push(child.children());
                }
                None => {
                    stack.pop();
                }
            }
        }
        out
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.nodes.get_mut(id.index()).map(|n| &mut n.kind)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

/// Deepest level indented in [`Document::dump`].
pub const DUMP_MAX_INDENT: usize = 32;

fn dump_line(out: &mut String, depth: usize, kind: &NodeKind) {
    let indent = "  ".repeat(depth.min(DUMP_MAX_INDENT));
    if depth > DUMP_MAX_INDENT {
        let _ = writeln!(out, "{indent}({depth}) {}", describe(kind));
    } else {
        let _ = writeln!(out, "{indent}{}", describe(kind));
    }
}

fn describe(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Block(block) => match block {
            Block::OrderedList { start } => format!("ordered_list start={start}"),
            Block::Heading { level } => format!("heading level={level}"),
            Block::IndentedCodeBlock { literal } | Block::HtmlBlock { literal } => {
                format!("{} {literal:?}", block.block_type())
            }
            Block::FencedCodeBlock { info, literal } => {
                format!("fenced_code_block info={info:?} {literal:?}")
            }
            Block::LinkReferenceDefinition {
                label, destination, ..
            } => format!("link_reference_definition [{label}]: {destination}"),
            Block::Paragraph { fade_out: true } => "paragraph fade_out".to_owned(),
            Block::FootDefinition { label } | Block::FootReferenceDefinition { label } => {
                format!("{} [^{label}]", block.block_type())
            }
            other => other.block_type().to_string(),
        },
        NodeKind::Inline(inline) => match inline {
            Inline::Text(text) | Inline::Code(text) | Inline::HtmlInline(text) => {
                format!("{} {text:?}", inline.name())
            }
            Inline::Link { destination, .. } | Inline::Image { destination, .. } => {
                format!("{} {destination}", inline.name())
            }
            Inline::FootnoteReference { label } => format!("footnote_reference [^{label}]"),
            Inline::TaskMarker { checked } => format!("task_marker checked={checked}"),
            other => other.name().to_owned(),
        },
    }
}

/// Borrowed handle to a node in a [`Document`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn kind(self) -> &'a NodeKind {
        &self.doc.node(self.id).kind
    }

    #[must_use]
    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.link(self.doc.node(self.id).parent)
    }

    #[must_use]
    pub fn first_child(self) -> Option<NodeRef<'a>> {
        self.link(self.doc.node(self.id).first_child)
    }

    #[must_use]
    pub fn next_sibling(self) -> Option<NodeRef<'a>> {
        self.link(self.doc.node(self.id).next_sibling)
    }

    /// Direct children in document order.
    #[must_use]
    pub fn children(self) -> Children<'a> {
        Children {
            next: self.first_child(),
        }
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        self.doc.node(self.id).first_child.is_none()
    }

    fn link(self, id: Option<NodeId>) -> Option<NodeRef<'a>> {
        id.map(|id| NodeRef { doc: self.doc, id })
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

/// Iterator over the direct children of a node.
#[derive(Clone)]
pub struct Children<'a> {
    next: Option<NodeRef<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}

/// Incremental builder for a [`Document`].
///
/// Nodes are appended under the currently open container. [`open`](Self::open)
/// appends a node and makes it the container for subsequent calls;
/// [`close`](Self::close) returns to its parent.
///
/// ```
/// use mdwalk_ast::{Block, DocumentBuilder, Inline};
///
/// let mut builder = DocumentBuilder::new();
/// builder.open(Block::Paragraph { fade_out: false });
/// builder.leaf(Inline::Text("Hello".to_owned()));
/// builder.close();
/// let doc = builder.finish();
/// assert_eq!(doc.len(), 3);
/// ```
#[derive(Debug)]
pub struct DocumentBuilder {
    doc: Document,
    stack: Vec<NodeId>,
}

impl DocumentBuilder {
    /// Start a document containing only its root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            doc: Document {
                nodes: vec![Node {
                    kind: NodeKind::Block(Block::Document),
                    parent: None,
                    first_child: None,
                    last_child: None,
                    next_sibling: None,
                }],
            },
            stack: vec![NodeId::ROOT],
        }
    }

    /// Append a node under the current container and descend into it.
    pub fn open(&mut self, kind: impl Into<NodeKind>) -> NodeId {
        let id = self.append(kind.into());
        self.stack.push(id);
        id
    }

    /// Append a childless node under the current container.
    pub fn leaf(&mut self, kind: impl Into<NodeKind>) -> NodeId {
        self.append(kind.into())
    }

    /// Return to the parent of the current container.
    ///
    /// Closing the root is ignored.
    pub fn close(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Kind of the currently open container.
    #[must_use]
    pub fn current(&self) -> &NodeKind {
        &self.doc.node(self.current_id()).kind
    }

    /// Number of open containers, root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Finish building. Open containers are closed implicitly.
    #[must_use]
    pub fn finish(self) -> Document {
        self.doc
    }

    fn current_id(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current_id();
        let id = NodeId(u32::try_from(self.doc.nodes.len()).unwrap_or(u32::MAX));
        self.doc.nodes.push(Node {
            kind,
            parent: Some(parent),
            first_child: None,
            last_child: None,
            next_sibling: None,
        });

        let previous = self.doc.nodes[parent.index()].last_child.replace(id);
        match previous {
            Some(prev) => self.doc.nodes[prev.index()].next_sibling = Some(id),
            None => self.doc.nodes[parent.index()].first_child = Some(id),
        }
        id
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
