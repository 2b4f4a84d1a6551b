//! Markdown syntax tree for mdwalk.
//!
//! The tree is stored in an arena ([`Document`]) and navigated through
//! borrowed [`NodeRef`] handles. Every node carries a [`NodeKind`], which is
//! either a [`Block`] or an [`Inline`].
//!
//! Trees are normally produced from markdown text with [`parse`], which
//! adapts pulldown-cmark's event stream, but can also be assembled by hand
//! with [`DocumentBuilder`]. Hand-built trees are not validated: a list may
//! contain paragraphs, text may sit directly under the root. Consumers are
//! expected to cope.
//!
//! # Example
//!
//! ```
//! use mdwalk_ast::{Block, NodeKind, parse};
//!
//! let doc = parse("- one\n- two");
//! let list = doc.root().first_child().unwrap();
//! assert_eq!(list.kind(), &NodeKind::Block(Block::UnorderedList));
//! assert_eq!(list.children().count(), 2);
//! ```

mod node;
mod parse;
mod tree;

pub use node::{Alignment, Block, BlockType, Inline, NodeKind};
pub use parse::{ParseOptions, parse, parse_with};
pub use tree::{Children, DUMP_MAX_INDENT, Document, DocumentBuilder, NodeId, NodeRef};
