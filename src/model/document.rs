//! Document model structures.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// The body of a Word document: top-level paragraphs and top-level tables,
/// each in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Paragraphs that are direct children of the body
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,

    /// Tables that are direct children of the body
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Document {
    /// Visible text of the body.
    ///
    /// Paragraph texts come first, one per line, then every table cell's text,
    /// one per line. Two documents with equal visible text read the same to a
    /// user regardless of how their runs are split or serialized.
    pub fn visible_text(&self) -> String {
        let mut lines: Vec<String> = self.paragraphs.iter().map(Paragraph::plain_text).collect();
        for table in &self.tables {
            collect_cell_text(table, &mut lines);
        }
        lines.join("\n")
    }

    /// Every paragraph, body first and then table cells in order.
    pub fn all_paragraphs(&self) -> Vec<&Paragraph> {
        let mut out: Vec<&Paragraph> = self.paragraphs.iter().collect();
        for table in &self.tables {
            collect_cell_paragraphs(table, &mut out);
        }
        out
    }
}

fn collect_cell_text(table: &Table, lines: &mut Vec<String>) {
    for cell in table.cells() {
        lines.push(cell.plain_text());
        for nested in &cell.nested_tables {
            collect_cell_text(nested, lines);
        }
    }
}

fn collect_cell_paragraphs<'a>(table: &'a Table, out: &mut Vec<&'a Paragraph>) {
    for cell in table.cells() {
        out.extend(cell.content.iter());
        for nested in &cell.nested_tables {
            collect_cell_paragraphs(nested, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Row};

    fn sample() -> Document {
        let table = Table {
            rows: vec![Row {
                cells: vec![Cell::with_text("Contact: <<Nom>>")],
            }],
        };

        Document {
            paragraphs: vec![Paragraph::with_text("Titre"), Paragraph::with_text("")],
            tables: vec![table],
        }
    }

    #[test]
    fn test_visible_text_orders_paragraphs_then_cells() {
        assert_eq!(sample().visible_text(), "Titre\n\nContact: <<Nom>>");
    }

    #[test]
    fn test_all_paragraphs() {
        let doc = sample();
        let texts: Vec<String> = doc.all_paragraphs().iter().map(|p| p.plain_text()).collect();
        assert_eq!(texts, vec!["Titre", "", "Contact: <<Nom>>"]);
    }
}
