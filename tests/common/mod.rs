//! Synthetic Word packages for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const DOCX_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const DOTX_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";
const HEADER_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";

/// Bytes of a fake image stored in every package, to check raw copies.
pub const MEDIA_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

/// A paragraph with one run per text.
pub fn paragraph(runs: &[&str]) -> String {
    let mut xml = String::from("<w:p>");
    for text in runs {
        xml.push_str(&format!(
            r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#,
            escape(text)
        ));
    }
    xml.push_str("</w:p>");
    xml
}

/// A one-row table, each cell given as its paragraphs' XML.
pub fn table(cells: &[Vec<String>]) -> String {
    let mut xml = String::from("<w:tbl><w:tblPr/><w:tr>");
    for paragraphs in cells {
        xml.push_str(r#"<w:tc><w:tcPr><w:tcW w:w="2400" w:type="dxa"/></w:tcPr>"#);
        for p in paragraphs.iter() {
            xml.push_str(p);
        }
        xml.push_str("</w:tc>");
    }
    xml.push_str("</w:tr></w:tbl>");
    xml
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Builder for a minimal Word package.
pub struct DocxBuilder {
    body: String,
    header: Option<String>,
    main_type: &'static str,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self {
            body: String::new(),
            header: None,
            main_type: DOCX_MAIN,
        }
    }

    pub fn paragraph(mut self, runs: &[&str]) -> Self {
        self.body.push_str(&paragraph(runs));
        self
    }

    pub fn raw(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    pub fn header(mut self, runs: &[&str]) -> Self {
        self.header = Some(paragraph(runs));
        self
    }

    pub fn template(mut self) -> Self {
        self.main_type = DOTX_MAIN;
        self
    }

    pub fn document_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<w:document xmlns:w="{}"><w:body>{}<w:sectPr/></w:body></w:document>"#
            ),
            W_NS, self.body
        )
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut types = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Default Extension="png" ContentType="image/png"/>"#,
        ));
        types.push_str(&format!(
            r#"<Override PartName="/word/document.xml" ContentType="{}"/>"#,
            self.main_type
        ));
        if self.header.is_some() {
            types.push_str(&format!(
                r#"<Override PartName="/word/header1.xml" ContentType="{}"/>"#,
                HEADER_TYPE
            ));
        }
        types.push_str("</Types>");

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(types.as_bytes()).unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
        )
        .unwrap();

        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(self.document_xml().as_bytes()).unwrap();

        if let Some(header) = &self.header {
            zip.start_file("word/header1.xml", options).unwrap();
            zip.write_all(
                format!(r#"<w:hdr xmlns:w="{}">{}</w:hdr>"#, W_NS, header).as_bytes(),
            )
            .unwrap();
        }

        zip.start_file("word/media/image1.png", options).unwrap();
        zip.write_all(MEDIA_BYTES).unwrap();

        zip.finish().unwrap().into_inner()
    }
}

/// Read one entry of a package.
pub fn read_entry(package: &[u8], name: &str) -> Vec<u8> {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut data = Vec::new();
    entry.read_to_end(&mut data).unwrap();
    data
}

/// Entry names of a package, in archive order.
pub fn entry_names(package: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(package)).unwrap();
    archive.file_names().map(String::from).collect()
}
