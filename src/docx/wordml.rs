//! WordprocessingML helpers: reading run text and style, building runs.

use super::xml::{XmlElement, XmlNode};
use crate::error::Result;
use crate::model::{Cell, Paragraph, Row, Table, TextRun, TextStyle};

/// Paragraph-level containers whose runs are part of the paragraph text.
const RUN_CONTAINERS: &[&[u8]] = &[
    b"w:hyperlink",
    b"w:ins",
    b"w:moveTo",
    b"w:smartTag",
    b"w:fldSimple",
    b"w:customXml",
    b"w:sdt",
    b"w:sdtContent",
];

/// Runs of a paragraph with their text and style, in order.
pub(crate) fn paragraph_runs(paragraph: &XmlElement) -> Result<Vec<TextRun>> {
    let mut runs = Vec::new();
    collect_runs(paragraph, &mut runs)?;
    Ok(runs)
}

fn collect_runs(container: &XmlElement, runs: &mut Vec<TextRun>) -> Result<()> {
    for child in container.elements() {
        if child.is(b"w:r") {
            runs.push(TextRun::styled(run_text(child)?, run_style(child)));
        } else if RUN_CONTAINERS.iter().any(|name| child.is(name)) {
            collect_runs(child, runs)?;
        }
    }
    Ok(())
}

/// Visible text of a paragraph.
pub(crate) fn paragraph_text(paragraph: &XmlElement) -> Result<String> {
    Ok(paragraph_runs(paragraph)?
        .into_iter()
        .map(|run| run.text)
        .collect())
}

/// Visible text of a table cell: its direct paragraphs joined with newlines.
pub(crate) fn cell_text(cell: &XmlElement) -> Result<String> {
    let texts = cell
        .elements()
        .filter(|e| e.is(b"w:p"))
        .map(paragraph_text)
        .collect::<Result<Vec<_>>>()?;
    Ok(texts.join("\n"))
}

fn run_text(run: &XmlElement) -> Result<String> {
    let mut text = String::new();
    for child in run.elements() {
        match child.start.name().as_ref() {
            b"w:t" => text.push_str(&child.text()?),
            b"w:tab" | b"w:ptab" => text.push('\t'),
            b"w:cr" => text.push('\n'),
            b"w:br" => {
                if child.attr(b"w:type").map_or(true, |t| t == "textWrapping") {
                    text.push('\n');
                }
            }
            b"w:noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    Ok(text)
}

fn run_style(run: &XmlElement) -> TextStyle {
    let mut style = TextStyle::default();
    let Some(rpr) = run.child(b"w:rPr") else {
        return style;
    };
    for prop in rpr.elements() {
        match prop.start.name().as_ref() {
            b"w:b" => style.bold = is_on(prop),
            b"w:i" => style.italic = is_on(prop),
            b"w:u" => style.underline = prop.attr(b"w:val").map_or(true, |v| v != "none"),
            b"w:color" => {
                style.color = prop.attr(b"w:val").filter(|v| v != "auto");
            }
            _ => {}
        }
    }
    style
}

/// Toggle properties are on unless `w:val` says otherwise.
fn is_on(prop: &XmlElement) -> bool {
    prop.attr(b"w:val")
        .map_or(true, |v| !matches!(v.as_str(), "0" | "false" | "off"))
}

/// Build a `w:r` element for a run. Newlines become `w:br`, tabs `w:tab`.
/// An empty run is written as an empty `w:r`.
pub(crate) fn build_run(run: &TextRun) -> XmlElement {
    let mut element = XmlElement::new("w:r");
    if run.text.is_empty() {
        return element;
    }

    if run.style.has_formatting() {
        element = element.with_child(build_run_properties(&run.style));
    }

    let mut pending = String::new();
    for c in run.text.chars() {
        match c {
            '\n' | '\t' => {
                flush_text(&mut element, &mut pending);
                let name = if c == '\n' { "w:br" } else { "w:tab" };
                element = element.with_child(XmlElement::new(name));
            }
            c => pending.push(c),
        }
    }
    flush_text(&mut element, &mut pending);
    element
}

fn flush_text(element: &mut XmlElement, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let t = XmlElement::new("w:t")
        .with_attr("xml:space", "preserve")
        .with_text(pending);
    element.push(XmlNode::Element(t));
    pending.clear();
}

fn build_run_properties(style: &TextStyle) -> XmlElement {
    let mut rpr = XmlElement::new("w:rPr");
    if style.bold {
        rpr = rpr.with_child(XmlElement::new("w:b"));
    }
    if style.italic {
        rpr = rpr.with_child(XmlElement::new("w:i"));
    }
    if let Some(color) = &style.color {
        rpr = rpr.with_child(XmlElement::new("w:color").with_attr("w:val", color));
    }
    if style.underline {
        rpr = rpr.with_child(XmlElement::new("w:u").with_attr("w:val", "single"));
    }
    rpr
}

/// Replace the content of a paragraph with `runs`, keeping its properties.
pub(crate) fn rebuild_paragraph(paragraph: &mut XmlElement, runs: &[TextRun]) {
    paragraph
        .children
        .retain(|node| matches!(node, XmlNode::Element(e) if e.is(b"w:pPr")));
    for run in runs {
        paragraph.push(XmlNode::Element(build_run(run)));
    }
}

/// Collapse a table cell to a single paragraph holding `runs`.
///
/// Cell properties and the first paragraph's properties survive; every other
/// paragraph and nested table of the cell is dropped.
pub(crate) fn collapse_cell(cell: &mut XmlElement, runs: &[TextRun]) {
    let mut paragraph = cell
        .child(b"w:p")
        .cloned()
        .unwrap_or_else(|| XmlElement::new("w:p"));
    rebuild_paragraph(&mut paragraph, runs);

    cell.children
        .retain(|node| matches!(node, XmlNode::Element(e) if e.is(b"w:tcPr")));
    cell.push(XmlNode::Element(paragraph));
}

/// Project a `w:p` element into the model.
pub(crate) fn to_paragraph(element: &XmlElement) -> Result<Paragraph> {
    let style_id = element
        .child(b"w:pPr")
        .and_then(|ppr| ppr.child(b"w:pStyle"))
        .and_then(|s| s.attr(b"w:val"));
    Ok(Paragraph {
        runs: paragraph_runs(element)?,
        style_id,
    })
}

/// Project a `w:tbl` element into the model.
pub(crate) fn to_table(element: &XmlElement) -> Result<Table> {
    let rows = element
        .elements()
        .filter(|e| e.is(b"w:tr"))
        .map(|tr| {
            let cells = tr
                .elements()
                .filter(|e| e.is(b"w:tc"))
                .map(to_cell)
                .collect::<Result<_>>()?;
            Ok(Row { cells })
        })
        .collect::<Result<_>>()?;
    Ok(Table { rows })
}

fn to_cell(tc: &XmlElement) -> Result<Cell> {
    let mut cell = Cell::default();
    for child in tc.elements() {
        if child.is(b"w:p") {
            cell.content.push(to_paragraph(child)?);
        } else if child.is(b"w:tbl") {
            cell.nested_tables.push(to_table(child)?);
        }
    }
    Ok(cell)
}
