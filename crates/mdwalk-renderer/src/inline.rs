//! Inline span collection.
//!
//! Turns the inline children of a text block into a flat list of styled
//! [`Span`]s. Adjacent spans with the same style and link are merged.

use mdwalk_ast::{Children, Inline, NodeKind, NodeRef};

/// Styling flags of a span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub superscript: bool,
    pub subscript: bool,
}

impl SpanStyle {
    /// Whether no flag is set.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A run of text with uniform styling.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
    /// Link or image destination covering this span.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub link: Option<String>,
}

impl Span {
    /// Unstyled span.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SpanStyle::default(),
            link: None,
        }
    }
}

/// Collect the inline children of `parent` into styled spans.
///
/// Block nodes found among the children are skipped. Nesting is walked with
/// an explicit stack, so arbitrarily deep emphasis cannot exhaust the thread
/// stack.
#[must_use]
pub fn collect_spans(parent: NodeRef<'_>) -> Vec<Span> {
    let mut collector = SpanCollector { spans: Vec::new() };
    collector.walk(parent);
    collector.spans
}

/// Concatenated text of `spans`, styling dropped.
#[must_use]
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

/// An inline container being walked.
struct Frame<'a> {
    children: Children<'a>,
    style: SpanStyle,
    link: Option<&'a str>,
}

struct SpanCollector {
    spans: Vec<Span>,
}

impl SpanCollector {
    fn walk(&mut self, parent: NodeRef<'_>) {
        let mut stack = vec![Frame {
            children: parent.children(),
            style: SpanStyle::default(),
            link: None,
        }];

        while let Some(frame) = stack.last_mut() {
            let (style, link) = (frame.style, frame.link);
            let Some(child) = frame.children.next() else {
                stack.pop();
                continue;
            };
            let inline = match child.kind() {
                NodeKind::Inline(inline) => inline,
                NodeKind::Block(block) => {
                    tracing::debug!(
                        node = %child.id(),
                        block = %block.block_type(),
                        "Skipping block node inside inline content"
                    );
                    continue;
                }
            };

            let nested = |style, link| Frame {
                children: child.children(),
                style,
                link,
            };
            match inline {
                Inline::Text(text) | Inline::HtmlInline(text) => self.push(text, style, link),
                Inline::Code(code) => self.push(
                    code,
                    SpanStyle {
                        code: true,
                        ..style
                    },
                    link,
                ),
                Inline::SoftBreak => self.push(" ", style, link),
                Inline::HardBreak => self.push("\n", style, link),
                Inline::Emphasis => stack.push(nested(
                    SpanStyle {
                        emphasis: true,
                        ..style
                    },
                    link,
                )),
                Inline::Strong => stack.push(nested(
                    SpanStyle {
                        strong: true,
                        ..style
                    },
                    link,
                )),
                Inline::Strikethrough => stack.push(nested(
                    SpanStyle {
                        strikethrough: true,
                        ..style
                    },
                    link,
                )),
                Inline::Superscript => stack.push(nested(
                    SpanStyle {
                        superscript: true,
                        ..style
                    },
                    link,
                )),
                Inline::Subscript => stack.push(nested(
                    SpanStyle {
                        subscript: true,
                        ..style
                    },
                    link,
                )),
                Inline::Link { destination, .. } | Inline::Image { destination, .. } => {
                    stack.push(nested(style, Some(destination)));
                }
                Inline::FootnoteReference { label } => self.push(
                    &format!("[{label}]"),
                    SpanStyle {
                        superscript: true,
                        ..style
                    },
                    link,
                ),
                Inline::TaskMarker { checked } => {
                    self.push(if *checked { "[x] " } else { "[ ] " }, style, link);
                }
            }
        }
    }

    fn push(&mut self, text: &str, style: SpanStyle, link: Option<&str>) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut()
            && last.style == style
            && last.link.as_deref() == link
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(Span {
            text: text.to_owned(),
            style,
            link: link.map(ToOwned::to_owned),
        });
    }
}
