//! Output sink trait for tree rendering.
//!
//! The renderer never builds output itself. It drives a [`RenderSink`],
//! which owns the concrete layout primitives, in document order.

use mdwalk_ast::NodeRef;

/// List flavor passed to [`RenderSink::list_start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Accessibility role attached to a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum Role {
    Heading,
}

/// A rich-text block built from the inline children of `source`.
///
/// The sink decides how inline spans are styled; see
/// [`collect_spans`](crate::collect_spans) for the stock implementation.
#[derive(Clone, Copy, Debug)]
pub struct TextBlock<'a> {
    /// Block whose inline children form the text.
    pub source: NodeRef<'a>,
    /// Rendering hint for progressive reveal, passed through untouched.
    pub fade_out: bool,
}

impl<'a> TextBlock<'a> {
    #[must_use]
    pub fn new(source: NodeRef<'a>, fade_out: bool) -> Self {
        Self { source, fade_out }
    }
}

/// Backend trait for layout primitives.
///
/// Containers are bracketed by `*_start` / `*_end` calls; everything emitted
/// in between belongs to the container. Implementations should tolerate
/// unbalanced calls, since composers drive the sink directly.
pub trait RenderSink {
    /// Open a block quote container.
    fn block_quote_start(&mut self);

    /// Close the innermost block quote.
    fn block_quote_end(&mut self);

    /// Emit a horizontal rule.
    fn horizontal_rule(&mut self);

    /// Open a heading container.
    ///
    /// # Arguments
    ///
    /// * `level` - Heading level (1-6)
    /// * `role` - Accessibility role of the container
    fn heading_start(&mut self, level: u8, role: Role);

    /// Close the innermost heading.
    fn heading_end(&mut self);

    /// Emit a code block.
    ///
    /// # Arguments
    ///
    /// * `language` - Optional language identifier (e.g., "rust")
    /// * `text` - Code, already trimmed
    fn code_block(&mut self, language: Option<&str>, text: &str);

    /// Open a list.
    ///
    /// `start_index` is zero-based: the first item displays `start_index + 1`.
    fn list_start(&mut self, kind: ListKind, start_index: i64);

    /// Open the item at `index` (zero-based position among rendered items).
    fn list_item_start(&mut self, index: usize);

    /// Close the current list item.
    fn list_item_end(&mut self);

    /// Close the innermost list.
    fn list_end(&mut self);

    /// Emit a zero-content leaf that keeps layout spacing.
    fn empty_placeholder(&mut self);

    /// Emit a rich-text block.
    fn text_block(&mut self, block: TextBlock<'_>);

    /// Emit a plain, unstyled text run.
    fn text_run(&mut self, text: &str);

    /// Emit a placeholder for a raw HTML block.
    fn html_block(&mut self, literal: &str);

    /// Lay out a whole table from its root node.
    fn table(&mut self, table: NodeRef<'_>);
}
