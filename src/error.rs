//! Error types for the gendoc library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gendoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading inputs or generating a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but cannot be used here.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing or writing XML content.
    #[error("XML error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the package.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The template path does not resolve to a file.
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The workbook could not be read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The workbook has no worksheet to read a record from.
    #[error("Workbook contains no worksheet")]
    NoWorksheet,

    /// The first worksheet has a header row but no data row.
    #[error("Worksheet contains no data row")]
    NoRecord,

    /// Substitution or serialization failed; no document was produced.
    #[error("Document generation failed: {0}")]
    Fill(#[source] Box<Error>),
}

impl Error {
    /// Wrap an error raised while filling, leaving an existing fill error as is.
    pub(crate) fn into_fill(self) -> Self {
        match self {
            Error::Fill(_) => self,
            other => Error::Fill(Box::new(other)),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(feature = "xlsx")]
impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}
