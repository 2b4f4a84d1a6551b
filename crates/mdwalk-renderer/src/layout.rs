//! Layout tree sink.
//!
//! [`LayoutBuilder`] is the stock [`RenderSink`]: it turns sink calls into a
//! tree of [`LayoutBlock`]s that a UI layer can lay out. The [`Display`]
//! impl of [`Layout`] prints a plain-text preview of that tree.
//!
//! [`Display`]: std::fmt::Display

use std::fmt::{self, Write};

use mdwalk_ast::NodeRef;

use crate::inline::{Span, collect_spans};
use crate::sink::{ListKind, RenderSink, Role, TextBlock};
use crate::table::Table;

/// One renderable output block.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LayoutBlock {
    Quote(Vec<LayoutBlock>),
    Rule,
    Heading {
        level: u8,
        role: Role,
        content: Vec<LayoutBlock>,
    },
    Code {
        language: Option<String>,
        text: String,
    },
    List {
        kind: ListKind,
        /// Zero-based; the first item displays `start_index + 1`.
        start_index: i64,
        items: Vec<Vec<LayoutBlock>>,
    },
    Text {
        spans: Vec<Span>,
        fade_out: bool,
    },
    /// Plain text run.
    Run(String),
    /// Zero-content leaf, e.g. an empty list item.
    Empty,
    /// Raw HTML deferred to an HTML renderer.
    Html(String),
    Table(Table),
}

/// Rendered document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Layout {
    pub blocks: Vec<LayoutBlock>,
}

/// Container opened by a `*_start` call and not yet closed.
enum Open {
    Quote(Vec<LayoutBlock>),
    Heading {
        level: u8,
        role: Role,
        content: Vec<LayoutBlock>,
    },
    List {
        kind: ListKind,
        start_index: i64,
        items: Vec<Vec<LayoutBlock>>,
    },
    Item(Vec<LayoutBlock>),
}

impl Open {
    fn name(&self) -> &'static str {
        match self {
            Self::Quote(_) => "block quote",
            Self::Heading { .. } => "heading",
            Self::List { .. } => "list",
            Self::Item(_) => "list item",
        }
    }
}

/// [`RenderSink`] building a [`Layout`].
///
/// Unbalanced start/end calls never panic: a stray end call is ignored and
/// containers still open at [`finish`](Self::finish) are closed. Both are
/// logged as warnings.
#[derive(Default)]
pub struct LayoutBuilder {
    blocks: Vec<LayoutBlock>,
    open: Vec<Open>,
}

impl LayoutBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Close any open containers and return the layout.
    #[must_use]
    pub fn finish(mut self) -> Layout {
        while let Some(open) = self.open.pop() {
            tracing::warn!(container = open.name(), "Closing unterminated container");
            self.close(open);
        }
        Layout {
            blocks: self.blocks,
        }
    }

    fn push(&mut self, block: LayoutBlock) {
        match self.open.last_mut() {
            Some(Open::Quote(children) | Open::Item(children)) => children.push(block),
            Some(Open::Heading { content, .. }) => content.push(block),
            Some(Open::List { items, .. }) => {
                tracing::warn!("Block emitted between list items, wrapping in an item");
                items.push(vec![block]);
            }
            None => self.blocks.push(block),
        }
    }

    fn close(&mut self, open: Open) {
        match open {
            Open::Quote(children) => self.push(LayoutBlock::Quote(children)),
            Open::Heading {
                level,
                role,
                content,
            } => self.push(LayoutBlock::Heading {
                level,
                role,
                content,
            }),
            Open::List {
                kind,
                start_index,
                items,
            } => self.push(LayoutBlock::List {
                kind,
                start_index,
                items,
            }),
            Open::Item(children) => match self.open.last_mut() {
                Some(Open::List { items, .. }) => items.push(children),
                _ => {
                    tracing::warn!("List item closed outside of a list, keeping its content");
                    for child in children {
                        self.push(child);
                    }
                }
            },
        }
    }

    /// Close the innermost container if `matches` accepts it.
    fn end(&mut self, expected: &'static str, matches: fn(&Open) -> bool) {
        if self.open.last().is_some_and(matches) {
            if let Some(open) = self.open.pop() {
                self.close(open);
            }
        } else {
            tracing::warn!(
                expected,
                found = ?self.open.last().map(Open::name),
                "Ignoring unbalanced end call"
            );
        }
    }
}

impl RenderSink for LayoutBuilder {
    fn block_quote_start(&mut self) {
        self.open.push(Open::Quote(Vec::new()));
    }

    fn block_quote_end(&mut self) {
        self.end("block quote", |open| matches!(open, Open::Quote(_)));
    }

    fn horizontal_rule(&mut self) {
        self.push(LayoutBlock::Rule);
    }

    fn heading_start(&mut self, level: u8, role: Role) {
        self.open.push(Open::Heading {
            level,
            role,
            content: Vec::new(),
        });
    }

    fn heading_end(&mut self) {
        self.end("heading", |open| matches!(open, Open::Heading { .. }));
    }

    fn code_block(&mut self, language: Option<&str>, text: &str) {
        self.push(LayoutBlock::Code {
            language: language.map(ToOwned::to_owned),
            text: text.to_owned(),
        });
    }

    fn list_start(&mut self, kind: ListKind, start_index: i64) {
        self.open.push(Open::List {
            kind,
            start_index,
            items: Vec::new(),
        });
    }

    fn list_item_start(&mut self, _index: usize) {
        self.open.push(Open::Item(Vec::new()));
    }

    fn list_item_end(&mut self) {
        self.end("list item", |open| matches!(open, Open::Item(_)));
    }

    fn list_end(&mut self) {
        self.end("list", |open| matches!(open, Open::List { .. }));
    }

    fn empty_placeholder(&mut self) {
        self.push(LayoutBlock::Empty);
    }

    fn text_block(&mut self, block: TextBlock<'_>) {
        self.push(LayoutBlock::Text {
            spans: collect_spans(block.source),
            fade_out: block.fade_out,
        });
    }

    fn text_run(&mut self, text: &str) {
        self.push(LayoutBlock::Run(text.to_owned()));
    }

    fn html_block(&mut self, literal: &str) {
        self.push(LayoutBlock::Html(literal.to_owned()));
    }

    fn table(&mut self, table: NodeRef<'_>) {
        self.push(LayoutBlock::Table(Table::from_node(table)));
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_blocks(&self.blocks, "", &mut out);
        f.write_str(out.trim_end())
    }
}

fn write_blocks(blocks: &[LayoutBlock], prefix: &str, out: &mut String) {
    for block in blocks {
        write_block(block, prefix, out);
    }
}

fn write_block(block: &LayoutBlock, prefix: &str, out: &mut String) {
    match block {
        LayoutBlock::Quote(children) => write_blocks(children, &format!("{prefix}> "), out),
        LayoutBlock::Rule => line(out, prefix, "---"),
        LayoutBlock::Heading { level, content, .. } => {
            let mut text = String::new();
            for child in content {
                inline_text(child, &mut text);
            }
            let hashes = "#".repeat(usize::from(*level).clamp(1, 6));
            line(out, prefix, &format!("{hashes} {text}"));
        }
        LayoutBlock::Code { language, text } => {
            line(out, prefix, &format!("```{}", language.as_deref().unwrap_or("")));
            for code_line in text.lines() {
                line(out, prefix, code_line);
            }
            line(out, prefix, "```");
        }
        LayoutBlock::List {
            kind,
            start_index,
            items,
        } => {
            for (i, item) in items.iter().enumerate() {
                let marker = match kind {
                    ListKind::Unordered => "- ".to_owned(),
                    ListKind::Ordered => {
                        let number = i64::try_from(i)
                            .map_or(i64::MAX, |i| start_index.saturating_add(i + 1));
                        format!("{number}. ")
                    }
                };
                let mut body = String::new();
                write_blocks(item, "", &mut body);
                write_item(&marker, body.trim_end(), prefix, out);
            }
        }
        LayoutBlock::Text { spans, .. } => line(out, prefix, &styled(spans)),
        LayoutBlock::Run(text) | LayoutBlock::Html(text) => {
            for text_line in text.trim_end().lines() {
                line(out, prefix, text_line);
            }
        }
        LayoutBlock::Empty => line(out, prefix, ""),
        LayoutBlock::Table(table) => write_table(table, prefix, out),
    }
}

fn write_item(marker: &str, body: &str, prefix: &str, out: &mut String) {
    let indent = " ".repeat(marker.len());
    let mut lines = body.lines();
    line(
        out,
        prefix,
        &format!("{marker}{}", lines.next().unwrap_or_default()),
    );
    for rest in lines {
        line(out, prefix, &format!("{indent}{rest}"));
    }
}

fn write_table(table: &Table, prefix: &str, out: &mut String) {
    let row_text = |row: &Vec<Vec<Span>>| {
        let cells: Vec<String> = row.iter().map(|cell| styled(cell)).collect();
        format!("| {} |", cells.join(" | "))
    };
    for row in &table.header {
        line(out, prefix, &row_text(row));
    }
    if !table.header.is_empty() {
        let rule = vec!["---"; table.column_count()].join(" | ");
        line(out, prefix, &format!("| {rule} |"));
    }
    for row in &table.rows {
        line(out, prefix, &row_text(row));
    }
}

fn inline_text(block: &LayoutBlock, out: &mut String) {
    match block {
        LayoutBlock::Text { spans, .. } => out.push_str(&styled(spans)),
        LayoutBlock::Run(text) => out.push_str(text),
        _ => {}
    }
}

/// Spans with markdown-like emphasis markers.
fn styled(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        let style = span.style;
        let mut marker = String::new();
        if style.code {
            marker.push('`');
        }
        if style.strong {
            marker.push_str("**");
        }
        if style.emphasis {
            marker.push('*');
        }
        if style.strikethrough {
            marker.push_str("~~");
        }
        let closing: String = marker.chars().rev().collect();
        match &span.link {
            Some(link) => {
                let _ = write!(out, "[{marker}{}{closing}]({link})", span.text);
            }
            None => {
                let _ = write!(out, "{marker}{}{closing}", span.text);
            }
        }
    }
    out
}

fn line(out: &mut String, prefix: &str, text: &str) {
    out.push_str(prefix);
    out.push_str(text);
    out.push('\n');
}
