//! Table layout collaborator.

use mdwalk_ast::{Alignment, Block, NodeKind, NodeRef};

use crate::inline::{Span, collect_spans};

/// Spans of one table cell.
pub type Cell = Vec<Span>;

/// A table gathered from a [`Block::TableRoot`] subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Table {
    /// Column alignments.
    pub alignments: Vec<Alignment>,
    /// Header rows.
    pub header: Vec<Vec<Cell>>,
    /// Body rows.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Gather header and body rows below `root`.
    ///
    /// Rows placed directly under the root count as body rows. Nodes that do
    /// not belong in a table are skipped.
    #[must_use]
    pub fn from_node(root: NodeRef<'_>) -> Self {
        let mut table = Self {
            alignments: match root.kind() {
                NodeKind::Block(Block::TableRoot { alignments }) => alignments.clone(),
                _ => Vec::new(),
            },
            ..Self::default()
        };

        for section in root.children() {
            match section.kind() {
                NodeKind::Block(Block::TableHeader) => {
                    table.header.extend(section.children().filter_map(row_cells));
                }
                NodeKind::Block(Block::TableBody) => {
                    table.rows.extend(section.children().filter_map(row_cells));
                }
                NodeKind::Block(Block::TableRow) => table.rows.extend(row_cells(section)),
                _ => skip(section),
            }
        }
        table
    }

    /// Widest row, in cells.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.header
            .iter()
            .chain(&self.rows)
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.alignments.len())
    }
}

fn row_cells(row: NodeRef<'_>) -> Option<Vec<Cell>> {
    if !matches!(row.kind(), NodeKind::Block(Block::TableRow)) {
        skip(row);
        return None;
    }
    let cells = row
        .children()
        .filter_map(|cell| match cell.kind() {
            NodeKind::Block(Block::TableCell) => Some(collect_spans(cell)),
            _ => {
                skip(cell);
                None
            }
        })
        .collect();
    Some(cells)
}

fn skip(node: NodeRef<'_>) {
    tracing::debug!(node = %node.id(), "Skipping non-table node inside table");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::plain_text;
    use mdwalk_ast::{DocumentBuilder, Inline, parse};
    use pretty_assertions::assert_eq;

    fn texts(rows: &[Vec<Cell>]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| plain_text(cell)).collect())
            .collect()
    }

    #[test]
    fn test_from_markdown() {
        let doc = parse("| A | B |\n|:-:|---|\n| 1 | 2 |\n| 3 | 4 |");
        let table = Table::from_node(doc.root().first_child().unwrap());

        assert_eq!(table.alignments, vec![Alignment::Center, Alignment::None]);
        assert_eq!(texts(&table.header), vec![vec!["A", "B"]]);
        assert_eq!(texts(&table.rows), vec![vec!["1", "2"], vec!["3", "4"]]);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_styled_cell() {
        let doc = parse("| **bold** |\n|---|\n| x |");
        let table = Table::from_node(doc.root().first_child().unwrap());
        assert!(table.header[0][0][0].style.strong);
    }

    #[test]
    fn test_rows_without_body_and_stray_nodes() {
        let mut builder = DocumentBuilder::new();
        builder.open(Block::TableRoot {
            alignments: Vec::new(),
        });
        builder.open(Block::TableRow);
        builder.open(Block::TableCell);
        builder.leaf(Inline::Text("a".to_owned()));
        builder.close();
        builder.leaf(Block::ThematicBreak);
        builder.close();
        builder.leaf(Block::ThematicBreak);
        let doc = builder.finish();

        let table = Table::from_node(doc.root().first_child().unwrap());
        assert!(table.header.is_empty());
        assert_eq!(texts(&table.rows), vec![vec!["a"]]);
    }
}
