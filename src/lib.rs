//! # gendoc
//!
//! Fill Word templates with one record of spreadsheet data.
//!
//! A template is a `.docx` (or `.dotx`) file containing `<<FieldName>>`
//! placeholders. Filling replaces every placeholder with the matching field
//! of a [`Record`], emphasizes the inserted values (bold, accent color) and
//! names the result `"{code} CRV {YYYY.MM.DD}.docx"` from the record.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gendoc::{fill, Record};
//! use gendoc::docx::Template;
//!
//! let template = Template::open("template_assoc.docx")?;
//! let record = Record::new()
//!     .with("Nom", "Les Amis du Quartier")
//!     .with("Code de la structure", "A123")
//!     .with("Date de la dernière visite", "05/06/2024");
//!
//! let filled = fill(&template, &record)?;
//! assert_eq!(filled.filename, "A123 CRV 2024.06.05.docx");
//! filled.write_to("out")?;
//! # Ok::<(), gendoc::Error>(())
//! ```
//!
//! ## From a spreadsheet
//!
//! ```no_run
//! use gendoc::{generate, FillOptions};
//!
//! let filled = generate("template_assoc.docx", "associations.xlsx", &FillOptions::default())?;
//! println!("{}", filled.filename);
//! # Ok::<(), gendoc::Error>(())
//! ```
//!
//! ## Features
//!
//! - `xlsx` (default): read records from spreadsheets with `calamine`

pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod filename;
pub mod model;
pub mod options;
pub mod render;

#[cfg(feature = "xlsx")]
pub mod xlsx;

// Re-exports
pub use container::OoxmlContainer;
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use docx::{FillReport, Template};
pub use error::{Error, Result};
pub use filename::{derive_filename, parse_visit_date, DateParseError};
pub use model::{
    Cell, Document, FieldValue, Paragraph, Record, Row, Table, TextRun, TextStyle,
    MISSING_VALUE_TEXT,
};
pub use options::FillOptions;

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// A generated document: derived filename plus package bytes.
#[derive(Debug, Clone)]
pub struct FilledDocument {
    /// Output filename, e.g. `"A123 CRV 2024.06.05.docx"`
    pub filename: String,

    /// The `.docx` package
    pub data: Vec<u8>,

    /// What the fill changed
    pub report: FillReport,
}

impl FilledDocument {
    /// Write the document into `dir` under its filename, creating the
    /// directory if needed. Returns the written path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.data)?;
        info!(path = %path.display(), bytes = self.data.len(), "document written");
        Ok(path)
    }
}

/// Fill a template with a record using default options.
pub fn fill(template: &Template, record: &Record) -> Result<FilledDocument> {
    fill_with_options(template, record, &FillOptions::default())
}

/// Fill a template with a record.
///
/// Any failure while rewriting or re-packing is returned as
/// [`Error::Fill`]; no partial document is produced.
///
/// # Example
///
/// ```no_run
/// use gendoc::{fill_with_options, FillOptions, Record};
/// use gendoc::docx::Template;
///
/// let template = Template::open("template_assoc.docx")?;
/// let options = FillOptions::default()
///     .with_accent_color("1F4E79")
///     .with_headers_footers(true);
///
/// let filled = fill_with_options(&template, &Record::new().with("Nom", "Dupont"), &options)?;
/// # Ok::<(), gendoc::Error>(())
/// ```
#[instrument(skip_all, fields(fields = record.len()))]
pub fn fill_with_options(
    template: &Template,
    record: &Record,
    options: &FillOptions,
) -> Result<FilledDocument> {
    if !options.has_valid_accent_color() {
        return Err(Error::InvalidData(format!(
            "accent color '{}' is not a six-digit hex value",
            options.accent_color
        ))
        .into_fill());
    }

    for (key, value) in record.iter() {
        if value.is_absent() {
            tracing::debug!(%key, "field has no value");
        }
    }

    let (data, report) = template.render(record, options).map_err(Error::into_fill)?;
    let filename = derive_filename(record, options);

    if !report.unmatched.is_empty() {
        tracing::warn!(unmatched = ?report.unmatched, "placeholders without a field left in place");
    }
    info!(
        %filename,
        tokens = report.tokens_replaced,
        paragraphs = report.paragraphs_rewritten,
        cells = report.cells_rewritten,
        "document generated"
    );

    Ok(FilledDocument {
        filename,
        data,
        report,
    })
}

/// Open a template and a workbook and fill the template with the workbook's
/// first record.
#[cfg(feature = "xlsx")]
pub fn generate(
    template_path: impl AsRef<Path>,
    data_path: impl AsRef<Path>,
    options: &FillOptions,
) -> Result<FilledDocument> {
    let template = Template::open(template_path)?;
    let record = xlsx::read_first_record(data_path)?;
    fill_with_options(&template, &record, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_to_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let filled = FilledDocument {
            filename: "A123 CRV 2024.06.05.docx".to_string(),
            data: vec![1, 2, 3],
            report: FillReport::default(),
        };
        let path = filled.write_to(dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "A123 CRV 2024.06.05.docx");
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
