//! Placeholder substitution over parsed WordprocessingML parts.
//!
//! A paragraph (or table cell) is handled as a list of styled spans over its
//! visible text. Each record key is looked up in column order; every
//! occurrence of its token splits the spans and inserts an emphasized value
//! span. Literal text keeps the style it already had, so values inserted by
//! earlier keys stay emphasized.

use super::wordml::{cell_text, collapse_cell, paragraph_text, rebuild_paragraph};
use super::xml::XmlElement;
use crate::error::Result;
use crate::model::{Record, TextRun, TextStyle};
use crate::options::FillOptions;
use serde::Serialize;
use tracing::debug;

/// Counters collected while filling a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    /// Paragraphs rebuilt because a token matched
    pub paragraphs_rewritten: usize,
    /// Table cells collapsed because a token matched
    pub cells_rewritten: usize,
    /// Token occurrences replaced
    pub tokens_replaced: usize,
    /// Placeholders of the template with no field in the record
    pub unmatched: Vec<String>,
}

/// Split `runs` on every occurrence of `token`, inserting `value` between
/// the literal segments.
///
/// Returns `None` when the token does not occur. Empty literal segments are
/// kept as empty runs.
pub(crate) fn substitute(runs: &[TextRun], token: &str, value: &TextRun) -> Option<Vec<TextRun>> {
    if token.is_empty() {
        return None;
    }
    let text: String = runs.iter().map(|run| run.text.as_str()).collect();
    let hits: Vec<usize> = text.match_indices(token).map(|(at, _)| at).collect();
    if hits.is_empty() {
        return None;
    }

    let mut out = Vec::with_capacity(runs.len() + hits.len() * 2);
    let mut start = 0;
    for at in hits {
        push_literal(runs, start, at, &mut out);
        out.push(value.clone());
        start = at + token.len();
    }
    push_literal(runs, start, text.len(), &mut out);
    Some(out)
}

/// Append the slice `start..end` of the concatenated text of `runs`, one
/// run per overlapped source run, each with its source style.
fn push_literal(runs: &[TextRun], start: usize, end: usize, out: &mut Vec<TextRun>) {
    let before = out.len();
    let mut offset = 0;
    for run in runs {
        let run_start = offset;
        let run_end = offset + run.text.len();
        offset = run_end;

        let lo = start.max(run_start);
        let hi = end.min(run_end);
        if lo < hi {
            out.push(TextRun::styled(
                &run.text[lo - run_start..hi - run_start],
                run.style.clone(),
            ));
        }
    }
    if out.len() == before {
        out.push(TextRun::plain(""));
    }
}

fn occurrences(runs: &[TextRun], token: &str) -> usize {
    let text: String = runs.iter().map(|run| run.text.as_str()).collect();
    text.matches(token).count()
}

/// Fills parts of one template with one record.
pub(crate) struct Filler<'a> {
    record: &'a Record,
    options: &'a FillOptions,
    value_style: TextStyle,
    report: FillReport,
}

impl<'a> Filler<'a> {
    pub fn new(record: &'a Record, options: &'a FillOptions) -> Self {
        Self {
            record,
            options,
            value_style: TextStyle::emphasis(options.bold_values, options.accent_color.clone()),
            report: FillReport::default(),
        }
    }

    pub fn into_report(self) -> FillReport {
        self.report
    }

    /// Run every key over `text`. `None` when no token matched.
    fn fill_text(&mut self, text: String) -> Option<Vec<TextRun>> {
        let mut runs = vec![TextRun::plain(text)];
        let mut matched = false;

        for (key, value) in self.record.iter() {
            let token = self.options.token(key);
            let value = TextRun::styled(
                value.display(&self.options.missing_value_text),
                self.value_style.clone(),
            );
            if let Some(next) = substitute(&runs, &token, &value) {
                let count = occurrences(&runs, &token);
                debug!(%key, count, "placeholder substituted");
                self.report.tokens_replaced += count;
                runs = next;
                matched = true;
            }
        }

        matched.then_some(runs)
    }

    /// Fill the paragraphs and tables directly under `container`
    /// (`w:body`, `w:hdr` or `w:ftr`).
    pub fn fill_container(&mut self, container: &mut XmlElement) -> Result<()> {
        for child in container.elements_mut() {
            if child.is(b"w:p") {
                self.fill_paragraph(child)?;
            } else if child.is(b"w:tbl") {
                self.fill_table(child)?;
            }
        }
        Ok(())
    }

    fn fill_paragraph(&mut self, paragraph: &mut XmlElement) -> Result<()> {
        let text = paragraph_text(paragraph)?;
        if let Some(runs) = self.fill_text(text) {
            rebuild_paragraph(paragraph, &runs);
            self.report.paragraphs_rewritten += 1;
        }
        Ok(())
    }

    fn fill_table(&mut self, table: &mut XmlElement) -> Result<()> {
        for row in table.elements_mut().filter(|e| e.is(b"w:tr")) {
            for cell in row.elements_mut().filter(|e| e.is(b"w:tc")) {
                self.fill_cell(cell)?;
            }
        }
        Ok(())
    }

    fn fill_cell(&mut self, cell: &mut XmlElement) -> Result<()> {
        let text = cell_text(cell)?;
        match self.fill_text(text) {
            Some(runs) => {
                collapse_cell(cell, &runs);
                self.report.cells_rewritten += 1;
            }
            None => {
                for nested in cell.elements_mut().filter(|e| e.is(b"w:tbl")) {
                    self.fill_table(nested)?;
                }
            }
        }
        Ok(())
    }
}

/// Placeholder names (text between the delimiters) found in `text`, in order
/// of appearance.
pub fn find_placeholders(text: &str, open: &str, close: &str) -> Vec<String> {
    let mut names = Vec::new();
    if open.is_empty() || close.is_empty() {
        return names;
    }

    let mut rest = text;
    while let Some(at) = rest.find(open) {
        let after_open = &rest[at + open.len()..];
        let Some(end) = after_open.find(close) else {
            break;
        };
        let mut name = &after_open[..end];
        // A nested opener means the first one was stray text.
        if let Some(inner) = name.rfind(open) {
            name = &name[inner + open.len()..];
        }
        if !name.is_empty() && !name.contains('\n') {
            names.push(name.to_string());
        }
        rest = &after_open[end + close.len()..];
    }
    names
}
