//! Markdown to tree adapter built on pulldown-cmark.
//!
//! pulldown-cmark produces a flat event stream; this module folds it into a
//! [`Document`]. A few shapes are normalized on the way:
//!
//! - Inline content of tight list items is wrapped in an implicit paragraph.
//! - Table head cells get an implicit row, body rows an implicit body.
//! - Code and HTML block text is collected into the node's literal.
//! - Footnote definitions become [`Block::FootReferenceDefinition`].
//! - Link reference definitions are recovered from the parser's reference
//!   map and inserted at the position they were defined.
//! - Metadata blocks are skipped and definition lists are transparent.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::node::{Block, Inline, NodeKind};
use crate::tree::{Document, DocumentBuilder};

/// Parser configuration.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// GitHub Flavored Markdown: tables, strikethrough and task lists.
    pub gfm: bool,
    /// Footnote references and definitions.
    pub footnotes: bool,
    /// Mark the last paragraph of the document with `fade_out`.
    pub fade_out_trailing_paragraph: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            footnotes: true,
            fade_out_trailing_paragraph: false,
        }
    }
}

impl ParseOptions {
    /// pulldown-cmark options matching this configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        if self.footnotes {
            options |= Options::ENABLE_FOOTNOTES;
        }
        options
    }
}

/// Parse markdown with default options.
///
/// ```
/// use mdwalk_ast::{Block, NodeKind, parse};
///
/// let doc = parse("# Title\n\nBody");
/// let first = doc.root().first_child().unwrap();
/// assert_eq!(first.kind(), &NodeKind::Block(Block::Heading { level: 1 }));
/// ```
#[must_use]
pub fn parse(markdown: &str) -> Document {
    parse_with(markdown, &ParseOptions::default())
}

/// Parse markdown with the given options.
#[must_use]
pub fn parse_with(markdown: &str, options: &ParseOptions) -> Document {
    let mut iter = Parser::new_ext(markdown, options.parser_options()).into_offset_iter();
    let events: Vec<(Event<'_>, Range<usize>)> = iter.by_ref().collect();

    let mut definitions: Vec<PendingDefinition> = iter
        .reference_definitions()
        .iter()
        .map(|(label, def)| PendingDefinition {
            offset: def.span.start,
            label: label.to_owned(),
            destination: def.dest.to_string(),
            title: def.title.as_ref().map(ToString::to_string),
        })
        .collect();
    // Reverse source order so the next definition is popped from the end.
    definitions.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut assembler = Assembler {
        builder: DocumentBuilder::new(),
        frames: Vec::new(),
        definitions,
    };
    for (event, range) in events {
        assembler.event(event, range);
    }
    assembler.flush_definitions(usize::MAX);

    let mut doc = assembler.builder.finish();
    if options.fade_out_trailing_paragraph {
        mark_trailing_paragraph(&mut doc);
    }
    tracing::debug!(nodes = doc.len(), "Parsed markdown document");
    doc
}

fn mark_trailing_paragraph(doc: &mut Document) {
    let last = doc
        .iter()
        .filter(|node| matches!(node.kind(), NodeKind::Block(Block::Paragraph { .. })))
        .last()
        .map(|node| node.id());
    if let Some(id) = last
        && let Some(NodeKind::Block(Block::Paragraph { fade_out })) = doc.kind_mut(id)
    {
        *fade_out = true;
    }
}

struct PendingDefinition {
    offset: usize,
    label: String,
    destination: String,
    title: Option<String>,
}

enum LiteralKind {
    Indented,
    Fenced(String),
    Html,
}

/// Parser-side state for each open event tag.
enum Frame {
    /// Node opened for a start tag.
    Explicit,
    /// Node opened without a start tag (wrapping paragraph, table row/body).
    Implicit,
    /// Tag without a node of its own.
    Transparent,
    /// Code or HTML block collecting its text.
    Literal { kind: LiteralKind, buffer: String },
    /// Front matter, dropped.
    Metadata,
}

struct Assembler {
    builder: DocumentBuilder,
    frames: Vec<Frame>,
    definitions: Vec<PendingDefinition>,
}

impl Assembler {
    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        // End ranges span the whole element; its definitions go inside it.
        if !matches!(event, Event::End(_)) {
            self.flush_definitions(range.start);
        }
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(range.end),
            Event::Text(text) => match self.frames.last_mut() {
                Some(Frame::Literal { buffer, .. }) => buffer.push_str(&text),
                Some(Frame::Metadata) => {}
                _ => self.inline_leaf(Inline::Text(text.into_string())),
            },
            Event::Html(html) => match self.frames.last_mut() {
                Some(Frame::Literal { buffer, .. }) => buffer.push_str(&html),
                _ => self.inline_leaf(Inline::HtmlInline(html.into_string())),
            },
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.inline_leaf(Inline::Code(code.into_string()));
            }
            Event::InlineHtml(html) => self.inline_leaf(Inline::HtmlInline(html.into_string())),
            Event::FootnoteReference(label) => self.inline_leaf(Inline::FootnoteReference {
                label: label.into_string(),
            }),
            Event::SoftBreak => match self.frames.last_mut() {
                Some(Frame::Literal { buffer, .. }) => buffer.push('\n'),
                _ => self.inline_leaf(Inline::SoftBreak),
            },
            Event::HardBreak => self.inline_leaf(Inline::HardBreak),
            Event::Rule => {
                self.close_implicit_paragraph();
                self.builder.leaf(Block::ThematicBreak);
            }
            Event::TaskListMarker(checked) => self.inline_leaf(Inline::TaskMarker { checked }),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open_block(Block::Paragraph { fade_out: false }),
            Tag::Heading { level, .. } => self.open_block(Block::Heading {
                level: heading_level_to_num(level),
            }),
            Tag::BlockQuote(_) => self.open_block(Block::BlockQuote),
            Tag::CodeBlock(kind) => {
                let kind = match kind {
                    CodeBlockKind::Indented => LiteralKind::Indented,
                    CodeBlockKind::Fenced(info) => LiteralKind::Fenced(info.into_string()),
                };
                self.push_literal(kind);
            }
            Tag::HtmlBlock => self.push_literal(LiteralKind::Html),
            Tag::List(Some(start)) => self.open_block(Block::OrderedList { start }),
            Tag::List(None) => self.open_block(Block::UnorderedList),
            Tag::Item => self.open_block(Block::ListItem),
            Tag::FootnoteDefinition(label) => self.open_block(Block::FootReferenceDefinition {
                label: label.into_string(),
            }),
            Tag::DefinitionList | Tag::DefinitionListTitle | Tag::DefinitionListDefinition => {
                self.close_implicit_paragraph();
                self.frames.push(Frame::Transparent);
            }
            Tag::Table(alignments) => self.open_block(Block::TableRoot {
                alignments: alignments.into_iter().map(Into::into).collect(),
            }),
            Tag::TableHead => {
                self.open_block(Block::TableHeader);
                self.builder.open(Block::TableRow);
                self.frames.push(Frame::Implicit);
            }
            Tag::TableRow => {
                if matches!(
                    self.builder.current(),
                    NodeKind::Block(Block::TableRoot { .. })
                ) {
                    self.builder.open(Block::TableBody);
                    self.frames.push(Frame::Implicit);
                }
                self.open_block(Block::TableRow);
            }
            Tag::TableCell => self.open_block(Block::TableCell),
            Tag::Emphasis => self.open_inline(Inline::Emphasis),
            Tag::Strong => self.open_inline(Inline::Strong),
            Tag::Strikethrough => self.open_inline(Inline::Strikethrough),
            Tag::Superscript => self.open_inline(Inline::Superscript),
            Tag::Subscript => self.open_inline(Inline::Subscript),
            Tag::Link {
                dest_url, title, ..
            } => self.open_inline(Inline::Link {
                destination: dest_url.into_string(),
                title: title.into_string(),
            }),
            Tag::Image {
                dest_url, title, ..
            } => self.open_inline(Inline::Image {
                destination: dest_url.into_string(),
                title: title.into_string(),
            }),
            Tag::MetadataBlock(_) => self.frames.push(Frame::Metadata),
        }
    }

    fn end(&mut self, offset: usize) {
        while matches!(self.frames.last(), Some(Frame::Implicit)) {
            self.frames.pop();
            self.builder.close();
        }
        self.flush_definitions(offset);
        match self.frames.pop() {
            Some(Frame::Explicit) => self.builder.close(),
            Some(Frame::Literal { kind, buffer }) => {
                let block = match kind {
                    LiteralKind::Indented => Block::IndentedCodeBlock { literal: buffer },
                    LiteralKind::Fenced(info) => Block::FencedCodeBlock {
                        info,
                        literal: buffer,
                    },
                    LiteralKind::Html => Block::HtmlBlock { literal: buffer },
                };
                self.builder.leaf(block);
            }
            Some(Frame::Transparent | Frame::Metadata | Frame::Implicit) | None => {}
        }
    }

    fn open_block(&mut self, block: Block) {
        self.close_implicit_paragraph();
        self.builder.open(block);
        self.frames.push(Frame::Explicit);
    }

    fn open_inline(&mut self, inline: Inline) {
        self.ensure_inline_container();
        self.builder.open(inline);
        self.frames.push(Frame::Explicit);
    }

    fn inline_leaf(&mut self, inline: Inline) {
        self.ensure_inline_container();
        self.builder.leaf(inline);
    }

    fn push_literal(&mut self, kind: LiteralKind) {
        self.close_implicit_paragraph();
        self.frames.push(Frame::Literal {
            kind,
            buffer: String::new(),
        });
    }

    /// Open a wrapping paragraph when inline content lands in a block container.
    fn ensure_inline_container(&mut self) {
        if !self.builder.current().accepts_inline() {
            self.builder.open(Block::Paragraph { fade_out: false });
            self.frames.push(Frame::Implicit);
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if matches!(self.frames.last(), Some(Frame::Implicit))
            && matches!(
                self.builder.current(),
                NodeKind::Block(Block::Paragraph { .. })
            )
        {
            self.frames.pop();
            self.builder.close();
        }
    }

    /// Insert link reference definitions that start before `offset`.
    fn flush_definitions(&mut self, offset: usize) {
        if !self.accepts_definitions() {
            return;
        }
        while self
            .definitions
            .last()
            .is_some_and(|def| def.offset < offset)
        {
            let Some(def) = self.definitions.pop() else {
                break;
            };
            self.builder.leaf(Block::LinkReferenceDefinition {
                label: def.label,
                destination: def.destination,
                title: def.title,
            });
        }
    }

    fn accepts_definitions(&self) -> bool {
        let frame_ok = matches!(self.frames.last(), None | Some(Frame::Explicit));
        frame_ok
            && matches!(
                self.builder.current(),
                NodeKind::Block(
                    Block::Document
                        | Block::BlockQuote
                        | Block::ListItem
                        | Block::FootDefinition { .. }
                        | Block::FootReferenceDefinition { .. }
                )
            )
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Alignment, BlockType};
    use crate::tree::NodeRef;
    use pretty_assertions::assert_eq;

    fn block_types(node: NodeRef<'_>) -> Vec<Option<BlockType>> {
        node.children().map(|c| c.kind().block_type()).collect()
    }

    #[test]
    fn test_paragraph_and_heading() {
        let doc = parse("# Title\n\nHello *world*");
        assert_eq!(
            doc.dump(),
            "document\n  heading level=1\n    text \"Title\"\n  paragraph\n    text \"Hello \"\n    emphasis\n      text \"world\"\n"
        );
    }

    #[test]
    fn test_tight_list_items_get_implicit_paragraph() {
        let doc = parse("- one\n- two");
        let list = doc.root().first_child().unwrap();
        assert_eq!(list.kind(), &NodeKind::Block(Block::UnorderedList));
        for item in list.children() {
            assert_eq!(block_types(item), vec![Some(BlockType::Paragraph)]);
        }
    }

    #[test]
    fn test_tight_list_with_nested_list() {
        let doc = parse("- outer\n  - inner");
        let item = doc.root().first_child().unwrap().first_child().unwrap();
        assert_eq!(
            block_types(item),
            vec![Some(BlockType::Paragraph), Some(BlockType::UnorderedList)]
        );
    }

    #[test]
    fn test_ordered_list_start() {
        let doc = parse("5. five\n6. six");
        let list = doc.root().first_child().unwrap();
        assert_eq!(list.kind(), &NodeKind::Block(Block::OrderedList { start: 5 }));
        assert_eq!(list.children().count(), 2);
    }

    #[test]
    fn test_task_marker_inside_paragraph() {
        let doc = parse("- [x] done");
        let paragraph = doc
            .root()
            .first_child()
            .and_then(NodeRef::first_child)
            .and_then(NodeRef::first_child)
            .unwrap();
        let first = paragraph.first_child().unwrap();
        assert_eq!(
            first.kind(),
            &NodeKind::Inline(Inline::TaskMarker { checked: true })
        );
    }

    #[test]
    fn test_code_blocks_collect_literal() {
        let doc = parse("```rust\nfn main() {}\n```\n\n    indented\n");
        let kinds: Vec<_> = doc.root().children().map(|c| c.kind().clone()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Block(Block::FencedCodeBlock {
                    info: "rust".to_owned(),
                    literal: "fn main() {}\n".to_owned(),
                }),
                NodeKind::Block(Block::IndentedCodeBlock {
                    literal: "indented\n".to_owned(),
                }),
            ]
        );
    }

    #[test]
    fn test_html_block_literal() {
        let doc = parse("<div>\nhi\n</div>\n");
        let node = doc.root().first_child().unwrap();
        match node.kind() {
            NodeKind::Block(Block::HtmlBlock { literal }) => {
                assert!(literal.starts_with("<div>"));
                assert!(literal.contains("</div>"));
            }
            other => panic!("unexpected node {other:?}"),
        }
        assert!(node.is_leaf());
    }

    #[test]
    fn test_table_structure() {
        let doc = parse("| A | B |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |");
        let table = doc.root().first_child().unwrap();
        assert_eq!(
            table.kind(),
            &NodeKind::Block(Block::TableRoot {
                alignments: vec![Alignment::Left, Alignment::Right],
            })
        );
        assert_eq!(
            block_types(table),
            vec![Some(BlockType::TableHeader), Some(BlockType::TableBody)]
        );

        let header = table.first_child().unwrap();
        assert_eq!(block_types(header), vec![Some(BlockType::TableRow)]);
        let head_row = header.first_child().unwrap();
        assert_eq!(head_row.children().count(), 2);

        let body = header.next_sibling().unwrap();
        assert_eq!(body.children().count(), 2);
    }

    #[test]
    fn test_table_disabled_without_gfm() {
        let options = ParseOptions {
            gfm: false,
            ..ParseOptions::default()
        };
        let doc = parse_with("| A |\n|---|\n| 1 |", &options);
        assert_eq!(block_types(doc.root()), vec![Some(BlockType::Paragraph)]);
    }

    #[test]
    fn test_footnote_definition() {
        let doc = parse("Text[^1]\n\n[^1]: Note");
        let def = doc.root().children().nth(1).unwrap();
        assert_eq!(
            def.kind(),
            &NodeKind::Block(Block::FootReferenceDefinition {
                label: "1".to_owned()
            })
        );
        assert_eq!(block_types(def), vec![Some(BlockType::Paragraph)]);

        let reference = doc
            .root()
            .first_child()
            .unwrap()
            .children()
            .nth(1)
            .unwrap();
        assert_eq!(
            reference.kind(),
            &NodeKind::Inline(Inline::FootnoteReference {
                label: "1".to_owned()
            })
        );
    }

    #[test]
    fn test_link_reference_definition_in_source_order() {
        let doc = parse("First\n\n[home]: https://example.com \"Home\"\n\nSecond");
        assert_eq!(
            block_types(doc.root()),
            vec![
                Some(BlockType::Paragraph),
                Some(BlockType::LinkReferenceDefinition),
                Some(BlockType::Paragraph),
            ]
        );
        let def = doc.root().children().nth(1).unwrap();
        match def.kind() {
            NodeKind::Block(Block::LinkReferenceDefinition {
                destination, title, ..
            }) => {
                assert_eq!(destination, "https://example.com");
                assert_eq!(title.as_deref(), Some("Home"));
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    fn definition_parents(doc: &Document) -> Vec<Option<BlockType>> {
        doc.iter()
            .filter(|node| {
                matches!(
                    node.kind(),
                    NodeKind::Block(Block::LinkReferenceDefinition { .. })
                )
            })
            .map(|node| node.parent().and_then(|p| p.kind().block_type()))
            .collect()
    }

    #[test]
    fn test_link_reference_definition_inside_list_item() {
        let doc = parse("- [a]: http://x\n- b\n");
        let list = doc.root().first_child().unwrap();
        let items: Vec<_> = list.children().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(
            block_types(items[0]),
            vec![Some(BlockType::LinkReferenceDefinition)]
        );
        assert_eq!(block_types(items[1]), vec![Some(BlockType::Paragraph)]);
    }

    #[test]
    fn test_link_reference_definition_inside_block_quote() {
        let doc = parse("> [a]: http://x\n");
        assert_eq!(block_types(doc.root()), vec![Some(BlockType::BlockQuote)]);
        assert_eq!(definition_parents(&doc), vec![Some(BlockType::BlockQuote)]);
    }

    #[test]
    fn test_link_reference_definition_in_quote_between_paragraphs() {
        let doc = parse("para\n\n> [a]: http://x\n\nafter\n");
        assert_eq!(
            block_types(doc.root()),
            vec![
                Some(BlockType::Paragraph),
                Some(BlockType::BlockQuote),
                Some(BlockType::Paragraph),
            ]
        );
        let quote = doc.root().children().nth(1).unwrap();
        assert_eq!(
            block_types(quote),
            vec![Some(BlockType::LinkReferenceDefinition)]
        );
    }

    #[test]
    fn test_link_reference_definition_after_quoted_paragraph() {
        let doc = parse("> text\n>\n> [a]: http://x\n\nafter\n");
        let quote = doc.root().first_child().unwrap();
        assert_eq!(
            block_types(quote),
            vec![
                Some(BlockType::Paragraph),
                Some(BlockType::LinkReferenceDefinition),
            ]
        );
        assert_eq!(definition_parents(&doc), vec![Some(BlockType::BlockQuote)]);
    }

    #[test]
    fn test_thematic_break_and_blockquote() {
        let doc = parse("> quoted\n\n---\n");
        assert_eq!(
            block_types(doc.root()),
            vec![Some(BlockType::BlockQuote), Some(BlockType::ThematicBreak)]
        );
    }

    #[test]
    fn test_fade_out_marks_last_paragraph_only() {
        let options = ParseOptions {
            fade_out_trailing_paragraph: true,
            ..ParseOptions::default()
        };
        let doc = parse_with("one\n\ntwo\n\n- three", &options);
        let flags: Vec<bool> = doc
            .iter()
            .filter_map(|node| match node.kind() {
                NodeKind::Block(Block::Paragraph { fade_out }) => Some(*fade_out),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn test_parser_options() {
        let options = ParseOptions::default().parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_FOOTNOTES));

        let bare = ParseOptions {
            gfm: false,
            footnotes: false,
            fade_out_trailing_paragraph: false,
        };
        assert_eq!(bare.parser_options(), Options::empty());
    }

    #[test]
    fn test_empty_input() {
        let doc = parse("");
        assert!(doc.is_empty());
    }
}
