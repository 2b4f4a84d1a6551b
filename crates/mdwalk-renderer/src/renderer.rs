//! Public entry point.

use mdwalk_ast::{Document, ParseOptions, parse_with};

use crate::composer::Composer;
use crate::context::{DEFAULT_MAX_DEPTH, RenderContext};
use crate::diagnostic::Diagnostic;
use crate::layout::{Layout, LayoutBuilder};
use crate::sink::RenderSink;

/// Result of rendering into a [`Layout`].
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered layout tree.
    pub layout: Layout,
    /// Misplaced nodes encountered during the pass.
    pub diagnostics: Vec<Diagnostic>,
}

/// Document renderer with an optional composer.
///
/// # Example
///
/// ```
/// use mdwalk_renderer::{LayoutBlock, LayoutBuilder, Renderer};
///
/// let result = Renderer::<LayoutBuilder>::new().render_markdown("---");
/// assert_eq!(result.layout.blocks, vec![LayoutBlock::Rule]);
/// assert!(result.diagnostics.is_empty());
/// ```
pub struct Renderer<S: RenderSink> {
    composer: Option<Box<dyn Composer<S>>>,
    max_depth: usize,
    parse_options: ParseOptions,
}

impl<S: RenderSink> Renderer<S> {
    /// Create a renderer using only the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            composer: None,
            max_depth: DEFAULT_MAX_DEPTH,
            parse_options: ParseOptions::default(),
        }
    }

    /// Install the composer for this renderer, replacing any previous one.
    #[must_use]
    pub fn with_composer<C: Composer<S> + 'static>(mut self, composer: C) -> Self {
        self.composer = Some(Box::new(composer));
        self
    }

    /// Limit nesting depth (default: 256).
    ///
    /// Block rendering recurses once per level, so the limit must fit the
    /// calling thread's stack.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Options used by [`render_markdown`](Renderer::render_markdown).
    #[must_use]
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Render `doc` into `sink` and return the diagnostics of the pass.
    pub fn render(&self, doc: &Document, sink: &mut S) -> Vec<Diagnostic> {
        let mut cx =
            RenderContext::new(sink, self.composer.as_deref()).with_max_depth(self.max_depth);
        cx.render(Some(doc.root()));
        let diagnostics = cx.into_diagnostics();
        if !diagnostics.is_empty() {
            tracing::debug!(count = diagnostics.len(), "Rendered with diagnostics");
        }
        diagnostics
    }
}

impl Renderer<LayoutBuilder> {
    /// Render `doc` into a fresh [`Layout`].
    #[must_use]
    pub fn render_layout(&self, doc: &Document) -> RenderResult {
        let mut builder = LayoutBuilder::new();
        let diagnostics = self.render(doc, &mut builder);
        RenderResult {
            layout: builder.finish(),
            diagnostics,
        }
    }

    /// Parse markdown and render it into a [`Layout`].
    #[must_use]
    pub fn render_markdown(&self, markdown: &str) -> RenderResult {
        self.render_layout(&parse_with(markdown, &self.parse_options))
    }
}

impl<S: RenderSink> Default for Renderer<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::layout::LayoutBlock;
    use crate::sink::Role;
    use mdwalk_ast::{Block, BlockType, DocumentBuilder, NodeRef};
    use pretty_assertions::assert_eq;

    struct CodeAsRun;

    impl<S: RenderSink> Composer<S> for CodeAsRun {
        fn claims(&self, block: BlockType) -> bool {
            block == BlockType::FencedCodeBlock
        }

        fn compose(&self, node: NodeRef<'_>, cx: &mut RenderContext<'_, S>) {
            if let mdwalk_ast::NodeKind::Block(Block::FencedCodeBlock { literal, .. }) = node.kind()
            {
                cx.sink().text_run(literal.trim());
            }
        }
    }

    #[test]
    fn test_render_markdown() {
        let result = Renderer::<LayoutBuilder>::new().render_markdown("# Hi\n\ntext");
        assert_eq!(result.layout.blocks.len(), 2);
        assert!(matches!(
            result.layout.blocks[0],
            LayoutBlock::Heading {
                level: 1,
                role: Role::Heading,
                ..
            }
        ));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_with_composer() {
        let result = Renderer::<LayoutBuilder>::new()
            .with_composer(CodeAsRun)
            .render_markdown("```\nlet x = 1;\n```");
        assert_eq!(
            result.layout.blocks,
            vec![LayoutBlock::Run("let x = 1;".to_owned())]
        );
    }

    #[test]
    fn test_with_max_depth() {
        let result = Renderer::<LayoutBuilder>::new()
            .with_max_depth(3)
            .render_markdown("> > > deep");

        // document, quote, quote fit; the third quote does not.
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::DepthExceeded);
        assert_eq!(
            result.layout.blocks,
            vec![LayoutBlock::Quote(vec![LayoutBlock::Quote(Vec::new())])]
        );
    }

    #[test]
    fn test_parse_options_fade_out() {
        let result = Renderer::<LayoutBuilder>::new()
            .with_parse_options(ParseOptions {
                fade_out_trailing_paragraph: true,
                ..ParseOptions::default()
            })
            .render_markdown("first\n\nlast");
        let fades: Vec<bool> = result
            .layout
            .blocks
            .iter()
            .filter_map(|block| match block {
                LayoutBlock::Text { fade_out, .. } => Some(*fade_out),
                _ => None,
            })
            .collect();
        assert_eq!(fades, vec![false, true]);
    }

    #[test]
    fn test_render_into_layout_with_diagnostics() {
        let mut builder = DocumentBuilder::new();
        builder.leaf(mdwalk_ast::Inline::Text("loose".to_owned()));
        let doc = builder.finish();

        let result = Renderer::<LayoutBuilder>::default().render_layout(&doc);
        assert_eq!(
            result.layout.blocks,
            vec![LayoutBlock::Run("loose".to_owned())]
        );
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::TextOutsideBlock);
    }

    #[test]
    fn test_very_deep_tree_does_not_overflow() {
        let mut builder = DocumentBuilder::new();
        for _ in 0..10_000 {
            builder.open(Block::BlockQuote);
        }
        let doc = builder.finish();

        let result = Renderer::<LayoutBuilder>::new().render_layout(&doc);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::DepthExceeded);
    }

    #[test]
    fn test_deeply_nested_inline_markup_does_not_overflow() {
        let depth = 20_000;
        let markdown = format!("{}a{}", "*".repeat(depth), "*".repeat(depth));

        let result = Renderer::<LayoutBuilder>::new().render_markdown(&markdown);
        let [LayoutBlock::Text { spans, .. }] = result.layout.blocks.as_slice() else {
            panic!("expected one text block, got {:?}", result.layout.blocks);
        };
        assert_eq!(crate::inline::plain_text(spans), "a");
        assert!(result.diagnostics.is_empty());
    }
}

