//! Table projection of a Word body.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// A table cell: its paragraphs and any tables nested inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub content: Vec<Paragraph>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_tables: Vec<Table>,
}

impl Cell {
    /// Single-paragraph cell.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Paragraph::with_text(text)],
            nested_tables: Vec::new(),
        }
    }

    /// Paragraph texts joined with newlines, the way a cell is matched.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// Every cell, row by row. Nested tables are not descended into.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_joins_paragraphs() {
        let cell = Cell {
            content: vec![Paragraph::with_text("Contact:"), Paragraph::with_text("Dupont")],
            nested_tables: Vec::new(),
        };
        assert_eq!(cell.plain_text(), "Contact:\nDupont");
        assert_eq!(Cell::default().plain_text(), "");
    }

    #[test]
    fn cells_skip_nested_tables() {
        let mut outer = Cell::with_text("A1");
        outer.nested_tables.push(Table {
            rows: vec![Row { cells: vec![Cell::with_text("inner")] }],
        });
        let table = Table {
            rows: vec![Row { cells: vec![outer, Cell::with_text("B1")] }],
        };

        let texts: Vec<_> = table.cells().map(Cell::plain_text).collect();
        assert_eq!(texts, vec!["A1", "B1"]);
    }
}
