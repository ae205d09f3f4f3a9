//! Word template: an opened package with its parsed text parts.

use super::filler::{find_placeholders, FillReport, Filler};
use super::wordml::{cell_text, paragraph_text, to_paragraph, to_table};
use super::xml::{XmlElement, XmlTree};
use crate::container::OoxmlContainer;
use crate::detect::{detect_format_from_bytes, FormatType, DOCX_CONTENT_TYPE, DOTX_CONTENT_TYPE};
use crate::error::{Error, Result};
use crate::model::{Document, Record};
use crate::options::FillOptions;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument};

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const DEFAULT_MAIN_PART: &str = "word/document.xml";
const HEADER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const FOOTER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

/// A parsed XML part and its name inside the package.
#[derive(Debug, Clone)]
struct Part {
    name: String,
    tree: XmlTree,
}

impl Part {
    fn read(container: &OoxmlContainer, name: &str) -> Result<Self> {
        let xml = container.read_xml(name)?;
        Ok(Self {
            name: name.to_string(),
            tree: XmlTree::parse(&xml)?,
        })
    }
}

/// An opened Word template (`.docx` or `.dotx`).
///
/// Opening parses the main document part. Header and footer parts are only
/// parsed by calls whose options enable them. The template is never
/// modified: each fill works on a copy of the parsed parts and writes a new
/// archive.
///
/// # Example
///
/// ```no_run
/// use gendoc::docx::Template;
///
/// let template = Template::open("template_assoc.docx")?;
/// for name in template.placeholders()? {
///     println!("<<{}>>", name);
/// }
/// # Ok::<(), gendoc::Error>(())
/// ```
#[derive(Debug)]
pub struct Template {
    container: OoxmlContainer,
    format: FormatType,
    document: Part,
    headers_footers: Vec<String>,
}

impl Template {
    /// Open a template from a file path.
    ///
    /// A path that does not exist is reported as [`Error::TemplateNotFound`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::TemplateNotFound(path.to_path_buf()));
        }
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Open a template from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = detect_format_from_bytes(&data)?;
        if !format.is_word() {
            return Err(Error::UnsupportedFormat(format.name().to_string()));
        }
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container, format)
    }

    /// Open a template from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    fn from_container(container: OoxmlContainer, format: FormatType) -> Result<Self> {
        let overrides = read_overrides(&container)?;

        let main_name = overrides
            .iter()
            .find(|(_, ct)| ct == DOCX_CONTENT_TYPE || ct == DOTX_CONTENT_TYPE)
            .map_or(DEFAULT_MAIN_PART, |(name, _)| name.as_str())
            .to_string();
        let document = Part::read(&container, &main_name)?;
        if document.tree.root().and_then(body).is_none() {
            return Err(Error::MissingComponent(format!("{main_name}: w:body")));
        }

        let headers_footers = overrides
            .iter()
            .filter(|(_, ct)| ct == HEADER_CONTENT_TYPE || ct == FOOTER_CONTENT_TYPE)
            .filter(|(name, _)| container.exists(name))
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();

        debug!(
            main = %document.name,
            headers_footers = headers_footers.len(),
            %format,
            "template opened"
        );

        Ok(Self {
            container,
            format,
            document,
            headers_footers,
        })
    }

    /// The package format.
    pub fn format(&self) -> FormatType {
        self.format
    }

    /// Name of the main document part.
    pub fn main_part(&self) -> &str {
        &self.document.name
    }

    /// Names of the header and footer parts.
    pub fn header_footer_parts(&self) -> impl Iterator<Item = &str> {
        self.headers_footers.iter().map(String::as_str)
    }

    /// Read-only projection of the body: paragraphs and tables.
    pub fn document(&self) -> Result<Document> {
        let mut doc = Document::default();
        let Some(body) = self.document.tree.root().and_then(body) else {
            return Ok(doc);
        };
        for child in body.elements() {
            if child.is(b"w:p") {
                doc.paragraphs.push(to_paragraph(child)?);
            } else if child.is(b"w:tbl") {
                doc.tables.push(to_table(child)?);
            }
        }
        Ok(doc)
    }

    /// Distinct placeholder names of the body, with the default delimiters.
    pub fn placeholders(&self) -> Result<Vec<String>> {
        self.placeholders_with(&FillOptions::default())
    }

    /// Distinct placeholder names, in order of first appearance, using the
    /// delimiters of `options`. Headers and footers are included when
    /// `options` enables them.
    ///
    /// Names are scanned per paragraph and per table cell, which is the
    /// scope a token must fit in to be filled.
    pub fn placeholders_with(&self, options: &FillOptions) -> Result<Vec<String>> {
        let parts = self.header_footer_trees(options)?;
        Ok(self.placeholders_in(&parts, options))
    }

    /// Header and footer parts, parsed. Empty unless `options` enables them.
    fn header_footer_trees(&self, options: &FillOptions) -> Result<Vec<Part>> {
        if !options.include_headers_footers {
            return Ok(Vec::new());
        }
        self.headers_footers
            .iter()
            .map(|name| Part::read(&self.container, name))
            .collect()
    }

    fn placeholders_in(&self, parts: &[Part], options: &FillOptions) -> Vec<String> {
        let mut texts = Vec::new();
        if let Some(body) = self.document.tree.root().and_then(body) {
            collect_texts(body, &mut texts);
        }
        for part in parts {
            if let Some(root) = part.tree.root() {
                collect_texts(root, &mut texts);
            }
        }

        let mut names: Vec<String> = Vec::new();
        for text in texts {
            for name in find_placeholders(&text, &options.token_open, &options.token_close) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Fill a copy of the parts and write a new package.
    #[instrument(skip_all, fields(fields = record.len()))]
    pub(crate) fn render(&self, record: &Record, options: &FillOptions) -> Result<(Vec<u8>, FillReport)> {
        let parts = self.header_footer_trees(options)?;
        let unmatched: Vec<String> = self
            .placeholders_in(&parts, options)
            .into_iter()
            .filter(|name| record.get(name).is_none())
            .collect();

        let mut filler = Filler::new(record, options);
        let mut replacements: HashMap<String, Vec<u8>> = HashMap::new();

        let mut document = self.document.tree.clone();
        if let Some(body) = document.root_mut().and_then(body_mut) {
            filler.fill_container(body)?;
        }
        replacements.insert(self.document.name.clone(), document.to_bytes()?);

        for mut part in parts {
            if let Some(root) = part.tree.root_mut() {
                filler.fill_container(root)?;
            }
            replacements.insert(part.name, part.tree.to_bytes()?);
        }

        if self.format == FormatType::Dotx && options.extension == FormatType::Docx.extension() {
            let content_types = self.container.read_xml(CONTENT_TYPES_PART)?;
            replacements.insert(
                CONTENT_TYPES_PART.to_string(),
                content_types
                    .replace(DOTX_CONTENT_TYPE, DOCX_CONTENT_TYPE)
                    .into_bytes(),
            );
            debug!("template content type switched to document");
        }

        let mut report = filler.into_report();
        report.unmatched = unmatched;

        let data = self.container.repack(&replacements)?;
        Ok((data, report))
    }
}

fn body(root: &XmlElement) -> Option<&XmlElement> {
    root.child(b"w:body")
}

fn body_mut(root: &mut XmlElement) -> Option<&mut XmlElement> {
    root.elements_mut().find(|e| e.is(b"w:body"))
}

/// Texts of the fill scopes under `container`: each direct paragraph and each
/// table cell (nested tables included).
fn collect_texts(container: &XmlElement, texts: &mut Vec<String>) {
    for child in container.elements() {
        if child.is(b"w:p") {
            texts.extend(paragraph_text(child).ok());
        } else if child.is(b"w:tbl") {
            collect_table_texts(child, texts);
        }
    }
}

fn collect_table_texts(table: &XmlElement, texts: &mut Vec<String>) {
    for row in table.elements().filter(|e| e.is(b"w:tr")) {
        for cell in row.elements().filter(|e| e.is(b"w:tc")) {
            texts.extend(cell_text(cell).ok());
            for nested in cell.elements().filter(|e| e.is(b"w:tbl")) {
                collect_table_texts(nested, texts);
            }
        }
    }
}

/// `(part name, content type)` of every `Override` entry, part names without
/// their leading slash.
fn read_overrides(container: &OoxmlContainer) -> Result<Vec<(String, String)>> {
    let xml = container.read_xml(CONTENT_TYPES_PART)?;
    let tree = XmlTree::parse(&xml)?;
    let Some(types) = tree.root() else {
        return Ok(Vec::new());
    };

    Ok(types
        .elements()
        .filter(|e| e.is(b"Override"))
        .filter_map(|e| {
            let name = e.attr(b"PartName")?;
            let content_type = e.attr(b"ContentType")?;
            Some((name.trim_start_matches('/').to_string(), content_type))
        })
        .collect())
}
