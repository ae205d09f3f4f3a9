//! JSON renderer implementation.

use crate::error::{Error, Result};
use crate::model::{Document, Record};
use serde::Serialize;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a record to a JSON object in column order. Absent values are `null`.
pub fn to_json(record: &Record, format: JsonFormat) -> Result<String> {
    serialize(record, format)
}

/// Convert a document projection to JSON.
pub fn document_to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(value),
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
    };
    json.map_err(|e| Error::InvalidData(format!("JSON serialization error: {}", e)))
}
