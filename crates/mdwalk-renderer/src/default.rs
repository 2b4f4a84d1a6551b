//! Default node-to-output rules.

use mdwalk_ast::{Block, BlockType, Inline, NodeKind, NodeRef};

use crate::composer::Composer;
use crate::context::RenderContext;
use crate::diagnostic::DiagnosticKind;
use crate::filter::{all_children, fence_language, list_items, start_index};
use crate::sink::{ListKind, RenderSink, Role, TextBlock};

/// Fallback renderer with one rule per block variant.
///
/// Used for every node the active composer does not claim. It also
/// implements [`Composer`] claiming everything, so a custom composer can
/// delegate to it after emitting its own output.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRenderer;

impl<S: RenderSink> Composer<S> for DefaultRenderer {
    fn claims(&self, _block: BlockType) -> bool {
        true
    }

    fn compose(&self, node: NodeRef<'_>, cx: &mut RenderContext<'_, S>) {
        match node.kind() {
            NodeKind::Block(block) => compose_block(node, block, cx),
            NodeKind::Inline(Inline::Text(literal)) => {
                cx.report(node, DiagnosticKind::TextOutsideBlock);
                cx.sink().text_run(literal);
            }
            NodeKind::Inline(_) => cx.report(node, DiagnosticKind::InlineInBlockPosition),
        }
    }
}

// No wildcard arm: a new block variant must get a rule here.
fn compose_block<S: RenderSink>(node: NodeRef<'_>, block: &Block, cx: &mut RenderContext<'_, S>) {
    match block {
        Block::Document => cx.render_children(Some(node)),
        Block::BlockQuote => {
            cx.sink().block_quote_start();
            cx.render_children(Some(node));
            cx.sink().block_quote_end();
        }
        Block::UnorderedList => compose_list(ListKind::Unordered, 0, list_items(node), cx),
        // Ordered lists keep every child, unlike unordered lists.
        Block::OrderedList { start } => {
            compose_list(ListKind::Ordered, start_index(*start), all_children(node), cx);
        }
        Block::ThematicBreak => cx.sink().horizontal_rule(),
        Block::Heading { level } => {
            let sink = cx.sink();
            sink.heading_start(*level, Role::Heading);
            sink.text_block(TextBlock::new(node, false));
            sink.heading_end();
        }
        Block::IndentedCodeBlock { literal } => cx.sink().code_block(None, literal.trim()),
        Block::FencedCodeBlock { info, literal } => {
            cx.sink().code_block(fence_language(info), literal.trim());
        }
        Block::HtmlBlock { literal } => cx.sink().html_block(literal),
        Block::LinkReferenceDefinition { .. } => {}
        Block::Paragraph { fade_out } => cx.sink().text_block(TextBlock::new(node, *fade_out)),
        Block::TableRoot { .. } => cx.sink().table(node),
        Block::ListItem => cx.report(node, DiagnosticKind::ListItemOutsideList),
        Block::TableHeader | Block::TableBody | Block::TableRow | Block::TableCell => {
            cx.report(node, DiagnosticKind::TablePartOutsideTable);
        }
        Block::FootDefinition { label } => cx.sink().text_run(label),
        Block::FootReferenceDefinition { label } => {
            cx.sink().text_run(label);
            cx.render_children(Some(node));
        }
    }
}

fn compose_list<'a, S: RenderSink>(
    kind: ListKind,
    start_index: i64,
    items: impl Iterator<Item = NodeRef<'a>>,
    cx: &mut RenderContext<'_, S>,
) {
    cx.sink().list_start(kind, start_index);
    for (index, item) in items.enumerate() {
        cx.sink().list_item_start(index);
        if item.first_child().is_none() {
            cx.sink().empty_placeholder();
        } else {
            cx.render_children(Some(item));
        }
        cx.sink().list_item_end();
    }
    cx.sink().list_end();
}
