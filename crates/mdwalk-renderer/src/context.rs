//! Dispatcher and traversal state for one render pass.

use mdwalk_ast::NodeRef;

use crate::composer::Composer;
use crate::default::DefaultRenderer;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::sink::RenderSink;

/// Default limit on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Traversal state shared by the dispatcher, the default rules and composers.
///
/// Every node goes through [`render`](Self::render): if the active composer
/// claims the node's block type the composer renders it, otherwise the
/// [`DefaultRenderer`] does. Both receive this context back and continue the
/// walk through it.
pub struct RenderContext<'r, S: RenderSink> {
    sink: &'r mut S,
    composer: Option<&'r dyn Composer<S>>,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
    max_depth: usize,
}

impl<'r, S: RenderSink> RenderContext<'r, S> {
    /// Create a context writing into `sink`.
    pub fn new(sink: &'r mut S, composer: Option<&'r dyn Composer<S>>) -> Self {
        Self {
            sink,
            composer,
            diagnostics: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit nesting depth. Deeper subtrees are skipped with a diagnostic.
    ///
    /// Each level costs a few stack frames, so very large limits can exhaust
    /// the stack on hostile input.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Render one node. `None` is a no-op.
    pub fn render(&mut self, node: Option<NodeRef<'_>>) {
        let Some(node) = node else {
            return;
        };
        if self.depth >= self.max_depth {
            self.report(node, DiagnosticKind::DepthExceeded);
            return;
        }

        self.depth += 1;
        match self.claimant(node) {
            Some(composer) => composer.compose(node, self),
            None => DefaultRenderer.compose(node, self),
        }
        self.depth -= 1;
    }

    /// Render the direct children of `node` in document order.
    pub fn render_children(&mut self, node: Option<NodeRef<'_>>) {
        let Some(node) = node else {
            return;
        };
        for child in node.children() {
            self.render(Some(child));
        }
    }

    /// Output sink of this pass.
    pub fn sink(&mut self) -> &mut S {
        &mut *self.sink
    }

    /// Record a misplaced node.
    ///
    /// Diagnostics are also emitted as `tracing` warnings, so a subscriber can
    /// redirect or silence them.
    pub fn report(&mut self, node: NodeRef<'_>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(node, kind);
        tracing::warn!(
            node = %diagnostic.node,
            parent = ?diagnostic.parent,
            kind = ?diagnostic.kind,
            "{kind}"
        );
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Current nesting depth; zero outside of any node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Finish the pass and return its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn claimant(&self, node: NodeRef<'_>) -> Option<&'r dyn Composer<S>> {
        let composer = self.composer?;
        let block = node.kind().block_type()?;
        composer.claims(block).then_some(composer)
    }
}

/// Render `node` and its subtree into `sink`.
///
/// With no composer every node goes through the default rules. Returns the
/// diagnostics of the pass; rendering itself never fails.
pub fn render<S: RenderSink>(
    node: Option<NodeRef<'_>>,
    composer: Option<&dyn Composer<S>>,
    sink: &mut S,
) -> Vec<Diagnostic> {
    let mut cx = RenderContext::new(sink, composer);
    cx.render(node);
    cx.into_diagnostics()
}
