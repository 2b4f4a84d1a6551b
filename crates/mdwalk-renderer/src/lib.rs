//! Interceptable tree-walk renderer for markdown syntax trees.
//!
//! Rendering walks an [`mdwalk_ast::Document`] from the root and turns each
//! node into calls on a [`RenderSink`], the abstract output target.
//!
//! # Architecture
//!
//! - [`RenderContext`] is the dispatcher. For every node it asks the active
//!   [`Composer`] whether it claims the node's block type.
//! - Claimed nodes go to the composer, which decides what to emit and whether
//!   to descend. It keeps dispatching through the same context.
//! - Everything else goes to the [`DefaultRenderer`], which has one rule per
//!   block variant and reports misplaced nodes as [`Diagnostic`]s.
//! - [`LayoutBuilder`] is the bundled sink. It turns sink calls into a
//!   [`Layout`] tree of styled blocks with a plain-text preview.
//!
//! Rendering never fails: nodes in unexpected places are reported through
//! `tracing` and collected into the pass's diagnostics, then dropped.
//!
//! # Example
//!
//! ```
//! use mdwalk_renderer::{LayoutBlock, LayoutBuilder, Renderer};
//!
//! let result = Renderer::<LayoutBuilder>::new().render_markdown("# Title\n\n- a\n- b");
//! assert!(matches!(result.layout.blocks[0], LayoutBlock::Heading { level: 1, .. }));
//! assert!(matches!(result.layout.blocks[1], LayoutBlock::List { .. }));
//! ```

mod composer;
mod context;
mod default;
mod diagnostic;
mod filter;
mod inline;
mod layout;
mod renderer;
mod sink;
mod table;
#[cfg(test)]
mod testing;

pub use composer::Composer;
pub use context::{DEFAULT_MAX_DEPTH, RenderContext, render};
pub use default::DefaultRenderer;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use inline::{Span, SpanStyle, collect_spans, plain_text};
pub use layout::{Layout, LayoutBlock, LayoutBuilder};
pub use renderer::{RenderResult, Renderer};
pub use sink::{ListKind, RenderSink, Role, TextBlock};
pub use table::{Cell, Table};
