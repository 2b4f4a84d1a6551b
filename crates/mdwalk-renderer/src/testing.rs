//! Recording sink for unit tests.

use mdwalk_ast::{BlockType, NodeRef};

use crate::inline::{collect_spans, plain_text};
use crate::sink::{ListKind, RenderSink, Role, TextBlock};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    QuoteStart,
    QuoteEnd,
    Rule,
    HeadingStart(u8, Role),
    HeadingEnd,
    Code(Option<String>, String),
    ListStart(ListKind, i64),
    ItemStart(usize),
    ItemEnd,
    ListEnd,
    Empty,
    Text(String, bool),
    Run(String),
    Html(String),
    Table(BlockType),
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) calls: Vec<Call>,
}

impl RenderSink for RecordingSink {
    fn block_quote_start(&mut self) {
        self.calls.push(Call::QuoteStart);
    }

    fn block_quote_end(&mut self) {
        self.calls.push(Call::QuoteEnd);
    }

    fn horizontal_rule(&mut self) {
        self.calls.push(Call::Rule);
    }

    fn heading_start(&mut self, level: u8, role: Role) {
        self.calls.push(Call::HeadingStart(level, role));
    }

    fn heading_end(&mut self) {
        self.calls.push(Call::HeadingEnd);
    }

    fn code_block(&mut self, language: Option<&str>, text: &str) {
        self.calls
            .push(Call::Code(language.map(ToOwned::to_owned), text.to_owned()));
    }

    fn list_start(&mut self, kind: ListKind, start_index: i64) {
        self.calls.push(Call::ListStart(kind, start_index));
    }

    fn list_item_start(&mut self, index: usize) {
        self.calls.push(Call::ItemStart(index));
    }

    fn list_item_end(&mut self) {
        self.calls.push(Call::ItemEnd);
    }

    fn list_end(&mut self) {
        self.calls.push(Call::ListEnd);
    }

    fn empty_placeholder(&mut self) {
        self.calls.push(Call::Empty);
    }

    fn text_block(&mut self, block: TextBlock<'_>) {
        let text = plain_text(&collect_spans(block.source));
        self.calls.push(Call::Text(text, block.fade_out));
    }

    fn text_run(&mut self, text: &str) {
        self.calls.push(Call::Run(text.to_owned()));
    }

    fn html_block(&mut self, literal: &str) {
        self.calls.push(Call::Html(literal.to_owned()));
    }

    fn table(&mut self, table: NodeRef<'_>) {
        if let Some(block) = table.kind().block_type() {
            self.calls.push(Call::Table(block));
        }
    }
}
