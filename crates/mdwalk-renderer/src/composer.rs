//! Interception hook for custom rendering.

use mdwalk_ast::{BlockType, NodeRef};

use crate::context::RenderContext;
use crate::sink::RenderSink;

/// Takes over rendering of the block types it claims.
///
/// When a composer [`claims`](Self::claims) a node's block type, the renderer
/// calls [`compose`](Self::compose) instead of the default rule. The context
/// passed in is re-entrant: [`RenderContext::render_children`] and
/// [`RenderContext::render`] dispatch through this same composer again, so a
/// composer may wrap a subtree and let its descendants fall through to the
/// default rules, or claim descendants as well.
///
/// Not visiting a node's children forfeits their rendering entirely.
///
/// Composers are shared (`&self`) for the whole pass. Any state they keep is
/// their own business and needs interior mutability.
///
/// # Example
///
/// ```
/// use mdwalk_ast::{BlockType, NodeRef, parse};
/// use mdwalk_renderer::{Composer, LayoutBuilder, RenderContext, RenderSink, render};
///
/// /// Renders every block quote as a horizontal rule followed by its content.
/// struct QuoteAsRule;
///
/// impl<S: RenderSink> Composer<S> for QuoteAsRule {
///     fn claims(&self, block: BlockType) -> bool {
///         block == BlockType::BlockQuote
///     }
///
///     fn compose(&self, node: NodeRef<'_>, cx: &mut RenderContext<'_, S>) {
///         cx.sink().horizontal_rule();
///         cx.render_children(Some(node));
///     }
/// }
///
/// let doc = parse("> quoted");
/// let mut sink = LayoutBuilder::new();
/// let diagnostics = render(Some(doc.root()), Some(&QuoteAsRule), &mut sink);
/// assert!(diagnostics.is_empty());
/// assert_eq!(sink.finish().blocks.len(), 2);
/// ```
pub trait Composer<S: RenderSink> {
    /// Whether this composer renders nodes of the given block type.
    fn claims(&self, block: BlockType) -> bool;

    /// Render a claimed node.
    fn compose(&self, node: NodeRef<'_>, cx: &mut RenderContext<'_, S>);
}
