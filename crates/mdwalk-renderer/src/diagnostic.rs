//! Diagnostics for structurally misplaced nodes.

use std::fmt;

use mdwalk_ast::{BlockType, NodeId, NodeRef};

/// What was wrong with a node's position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiagnosticKind {
    /// Raw text where a block was expected; rendered as a plain run.
    TextOutsideBlock,
    /// Inline node other than text where a block was expected; dropped.
    InlineInBlockPosition,
    /// List item outside a list; dropped.
    ListItemOutsideList,
    /// Table header, body, row or cell outside a table; dropped.
    TablePartOutsideTable,
    /// Nesting exceeded the configured depth; subtree dropped.
    DepthExceeded,
}

impl DiagnosticKind {
    fn message(self) -> &'static str {
        match self {
            Self::TextOutsideBlock => "text node in block position, rendered as plain run",
            Self::InlineInBlockPosition => "inline node in block position, skipped",
            Self::ListItemOutsideList => "list item outside of a list, skipped",
            Self::TablePartOutsideTable => "table part outside of a table, skipped",
            Self::DepthExceeded => "maximum nesting depth exceeded, subtree skipped",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A recoverable rendering anomaly.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// Offending node.
    pub node: NodeId,
    /// Block type of the offending node's parent, if any.
    pub parent: Option<BlockType>,
    /// What was wrong.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    #[must_use]
    pub fn new(node: NodeRef<'_>, kind: DiagnosticKind) -> Self {
        Self {
            node: node.id(),
            parent: node.parent().and_then(|p| p.kind().block_type()),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent {
            Some(parent) => write!(f, "node {} under {parent}: {}", self.node, self.kind),
            None => write!(f, "node {}: {}", self.node, self.kind),
        }
    }
}
