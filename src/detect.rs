//! Format detection for templates and spreadsheet exports.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the main part of a Word document.
pub(crate) const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Content type for the main part of a Word template.
pub(crate) const DOTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";

/// Content type for the workbook part of an Excel file.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Detected package format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Word document (.docx)
    Docx,
    /// Word template (.dotx)
    Dotx,
    /// Excel workbook (.xlsx)
    Xlsx,
}

impl FormatType {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Docx => "docx",
            FormatType::Dotx => "dotx",
            FormatType::Xlsx => "xlsx",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Docx => "Word Document",
            FormatType::Dotx => "Word Template",
            FormatType::Xlsx => "Excel Workbook",
        }
    }

    /// Whether a package of this format can serve as a fill template.
    pub fn is_word(&self) -> bool {
        matches!(self, FormatType::Docx | FormatType::Dotx)
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format type from a file path.
///
/// # Example
///
/// ```no_run
/// use gendoc::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("template_assoc.docx")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), gendoc::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let file = File::open(path.as_ref())?;
    detect_format_from_reader(BufReader::new(file))
}

/// Detect the format type from a byte slice.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    detect_format_from_reader(std::io::Cursor::new(data))
}

/// Detect the format type from a reader.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<FormatType> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => return Err(Error::MissingComponent("[Content_Types].xml".to_string())),
    };

    format_from_content_types(&content_types).map_or_else(
        || {
            let names: Vec<String> = archive.file_names().map(String::from).collect();
            format_from_folders(&names)
        },
        Ok,
    )
}

fn format_from_content_types(content_types: &str) -> Option<FormatType> {
    if content_types.contains(DOCX_CONTENT_TYPE) {
        Some(FormatType::Docx)
    } else if content_types.contains(DOTX_CONTENT_TYPE) {
        Some(FormatType::Dotx)
    } else if content_types.contains(XLSX_CONTENT_TYPE) {
        Some(FormatType::Xlsx)
    } else {
        None
    }
}

fn format_from_folders(names: &[String]) -> Result<FormatType> {
    let has_word = names.iter().any(|n| n.starts_with("word/"));
    let has_xl = names.iter().any(|n| n.starts_with("xl/"));

    match (has_word, has_xl) {
        (true, false) => Ok(FormatType::Docx),
        (false, true) => Ok(FormatType::Xlsx),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn content_types(main: &str) -> String {
        format!(
            r#"<Types><Override PartName="/word/document.xml" ContentType="{main}"/></Types>"#
        )
    }

    #[test]
    fn test_format_type_display() {
        assert_eq!(FormatType::Docx.to_string(), "Word Document");
        assert_eq!(FormatType::Dotx.to_string(), "Word Template");
        assert_eq!(FormatType::Xlsx.extension(), "xlsx");
        assert!(FormatType::Dotx.is_word());
        assert!(!FormatType::Xlsx.is_word());
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B]));
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_format_from_bytes(&[0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_by_content_type() {
        let docx = package(&[("[Content_Types].xml", &content_types(DOCX_CONTENT_TYPE))]);
        assert_eq!(detect_format_from_bytes(&docx).unwrap(), FormatType::Docx);

        let dotx = package(&[("[Content_Types].xml", &content_types(DOTX_CONTENT_TYPE))]);
        assert_eq!(detect_format_from_bytes(&dotx).unwrap(), FormatType::Dotx);
    }

    #[test]
    fn test_detect_by_folder_fallback() {
        let xlsx = package(&[
            ("[Content_Types].xml", "<Types/>"),
            ("xl/workbook.xml", "<workbook/>"),
        ]);
        assert_eq!(detect_format_from_bytes(&xlsx).unwrap(), FormatType::Xlsx);
    }

    #[test]
    fn test_detect_missing_content_types() {
        let bare = package(&[("word/document.xml", "<w:document/>")]);
        assert!(matches!(
            detect_format_from_bytes(&bare),
            Err(Error::MissingComponent(_))
        ));
    }
}
