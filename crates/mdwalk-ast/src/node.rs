//! Node variants of the markdown tree.
//!
//! Every node is either a [`Block`] (occupies vertical layout space) or an
//! [`Inline`] (flows inside a block's text). The set of variants is closed:
//! adding one is a breaking change that every exhaustive `match` must pick up.

use std::fmt;

/// Column alignment of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(alignment: pulldown_cmark::Alignment) -> Self {
        match alignment {
            pulldown_cmark::Alignment::None => Self::None,
            pulldown_cmark::Alignment::Left => Self::Left,
            pulldown_cmark::Alignment::Center => Self::Center,
            pulldown_cmark::Alignment::Right => Self::Right,
        }
    }
}

/// Kind of a tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeKind {
    Block(Block),
    Inline(Inline),
}

impl NodeKind {
    /// Block discriminant, or `None` for inline nodes.
    #[must_use]
    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            Self::Block(block) => Some(block.block_type()),
            Self::Inline(_) => None,
        }
    }

    /// Whether this is a block-category node.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    /// Whether this node is a [`Block::ListItem`].
    #[must_use]
    pub fn is_list_item(&self) -> bool {
        matches!(self, Self::Block(Block::ListItem))
    }

    /// Whether inline content may be attached directly to this node.
    ///
    /// Block containers (document, quotes, list items, footnotes) only hold
    /// blocks; the parser adapter wraps stray inline content in a paragraph.
    #[must_use]
    pub fn accepts_inline(&self) -> bool {
        match self {
            Self::Block(block) => matches!(
                block,
                Block::Paragraph { .. } | Block::Heading { .. } | Block::TableCell
            ),
            Self::Inline(inline) => inline.is_container(),
        }
    }
}

impl From<Block> for NodeKind {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl From<Inline> for NodeKind {
    fn from(inline: Inline) -> Self {
        Self::Inline(inline)
    }
}

/// Block-category node variants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Block {
    /// Root of the tree.
    Document,
    BlockQuote,
    UnorderedList,
    /// Ordered list; `start` is the first displayed number.
    OrderedList {
        start: u64,
    },
    ThematicBreak,
    /// Heading with level 1-6. Children are inline nodes.
    Heading {
        level: u8,
    },
    IndentedCodeBlock {
        literal: String,
    },
    /// Fenced code block. `info` is the raw info string after the fence.
    FencedCodeBlock {
        info: String,
        literal: String,
    },
    HtmlBlock {
        literal: String,
    },
    LinkReferenceDefinition {
        label: String,
        destination: String,
        title: Option<String>,
    },
    /// Paragraph. Children are inline nodes.
    ///
    /// `fade_out` is an opaque rendering hint for the text collaborator.
    Paragraph {
        fade_out: bool,
    },
    TableRoot {
        alignments: Vec<Alignment>,
    },
    TableHeader,
    TableBody,
    TableRow,
    /// Table cell. Children are inline nodes.
    TableCell,
    ListItem,
    FootDefinition {
        label: String,
    },
    FootReferenceDefinition {
        label: String,
    },
}

impl Block {
    /// Fieldless discriminant of this block.
    #[must_use]
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Document => BlockType::Document,
            Self::BlockQuote => BlockType::BlockQuote,
            Self::UnorderedList => BlockType::UnorderedList,
            Self::OrderedList { .. } => BlockType::OrderedList,
            Self::ThematicBreak => BlockType::ThematicBreak,
            Self::Heading { .. } => BlockType::Heading,
            Self::IndentedCodeBlock { .. } => BlockType::IndentedCodeBlock,
            Self::FencedCodeBlock { .. } => BlockType::FencedCodeBlock,
            Self::HtmlBlock { .. } => BlockType::HtmlBlock,
            Self::LinkReferenceDefinition { .. } => BlockType::LinkReferenceDefinition,
            Self::Paragraph { .. } => BlockType::Paragraph,
            Self::TableRoot { .. } => BlockType::TableRoot,
            Self::TableHeader => BlockType::TableHeader,
            Self::TableBody => BlockType::TableBody,
            Self::TableRow => BlockType::TableRow,
            Self::TableCell => BlockType::TableCell,
            Self::ListItem => BlockType::ListItem,
            Self::FootDefinition { .. } => BlockType::FootDefinition,
            Self::FootReferenceDefinition { .. } => BlockType::FootReferenceDefinition,
        }
    }
}

/// Discriminant of [`Block`], used by composers to claim node types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BlockType {
    Document,
    BlockQuote,
    UnorderedList,
    OrderedList,
    ThematicBreak,
    Heading,
    IndentedCodeBlock,
    FencedCodeBlock,
    HtmlBlock,
    LinkReferenceDefinition,
    Paragraph,
    TableRoot,
    TableHeader,
    TableBody,
    TableRow,
    TableCell,
    ListItem,
    FootDefinition,
    FootReferenceDefinition,
}

impl BlockType {
    /// Every block type, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::Document,
        Self::BlockQuote,
        Self::UnorderedList,
        Self::OrderedList,
        Self::ThematicBreak,
        Self::Heading,
        Self::IndentedCodeBlock,
        Self::FencedCodeBlock,
        Self::HtmlBlock,
        Self::LinkReferenceDefinition,
        Self::Paragraph,
        Self::TableRoot,
        Self::TableHeader,
        Self::TableBody,
        Self::TableRow,
        Self::TableCell,
        Self::ListItem,
        Self::FootDefinition,
        Self::FootReferenceDefinition,
    ];

    /// Snake-case name, stable across releases.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::BlockQuote => "block_quote",
            Self::UnorderedList => "unordered_list",
            Self::OrderedList => "ordered_list",
            Self::ThematicBreak => "thematic_break",
            Self::Heading => "heading",
            Self::IndentedCodeBlock => "indented_code_block",
            Self::FencedCodeBlock => "fenced_code_block",
            Self::HtmlBlock => "html_block",
            Self::LinkReferenceDefinition => "link_reference_definition",
            Self::Paragraph => "paragraph",
            Self::TableRoot => "table_root",
            Self::TableHeader => "table_header",
            Self::TableBody => "table_body",
            Self::TableRow => "table_row",
            Self::TableCell => "table_cell",
            Self::ListItem => "list_item",
            Self::FootDefinition => "foot_definition",
            Self::FootReferenceDefinition => "foot_reference_definition",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline-category node variants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Subscript,
    Link {
        destination: String,
        title: String,
    },
    Image {
        destination: String,
        title: String,
    },
    HtmlInline(String),
    SoftBreak,
    HardBreak,
    FootnoteReference {
        label: String,
    },
    TaskMarker {
        checked: bool,
    },
}

impl Inline {
    /// Whether this inline variant wraps other inline nodes.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Emphasis
                | Self::Strong
                | Self::Strikethrough
                | Self::Superscript
                | Self::Subscript
                | Self::Link { .. }
                | Self::Image { .. }
        )
    }

    /// Short name used in diagnostics and tree dumps.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Code(_) => "code",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Strikethrough => "strikethrough",
            Self::Superscript => "superscript",
            Self::Subscript => "subscript",
            Self::Link { .. } => "link",
            Self::Image { .. } => "image",
            Self::HtmlInline(_) => "html_inline",
            Self::SoftBreak => "soft_break",
            Self::HardBreak => "hard_break",
            Self::FootnoteReference { .. } => "footnote_reference",
            Self::TaskMarker { .. } => "task_marker",
        }
    }
}
