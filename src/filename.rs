//! Output filename derivation: `"{code} CRV {YYYY.MM.DD}.{ext}"`.

use crate::model::{FieldValue, Record};
use crate::options::FillOptions;
use chrono::NaiveDate;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Input date layout of the visit-date field.
const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date layout inside the output filename.
const FILENAME_DATE_FORMAT: &str = "%Y.%m.%d";

/// Why a visit date could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// The field is absent from the record or has no value.
    Missing,
    /// The value is not a valid `DD/MM/YYYY` date.
    Malformed(String),
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateParseError::Missing => write!(f, "no visit date"),
            DateParseError::Malformed(raw) => write!(f, "'{raw}' is not a DD/MM/YYYY date"),
        }
    }
}

impl std::error::Error for DateParseError {}

/// Parse a `DD/MM/YYYY` date. Surrounding whitespace is ignored.
pub fn parse_visit_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Missing);
    }
    NaiveDate::parse_from_str(trimmed, INPUT_DATE_FORMAT)
        .map_err(|_| DateParseError::Malformed(trimmed.to_string()))
}

/// Read the visit date of a record.
pub fn visit_date(record: &Record, options: &FillOptions) -> Result<NaiveDate, DateParseError> {
    match record.get(&options.visit_date_field) {
        None | Some(FieldValue::Missing) => Err(DateParseError::Missing),
        Some(FieldValue::Text(raw)) => parse_visit_date(raw),
    }
}

/// Derive the output filename of a record.
///
/// The date segment falls back to [`FillOptions::undefined_date_text`] on
/// any parse failure; the code segment falls back to the missing-value text.
pub fn derive_filename(record: &Record, options: &FillOptions) -> String {
    let date = match visit_date(record, options) {
        Ok(date) => date.format(FILENAME_DATE_FORMAT).to_string(),
        Err(err) => {
            tracing::warn!(field = %options.visit_date_field, %err, "visit date unavailable");
            options.undefined_date_text.clone()
        }
    };

    if record
        .get(&options.structure_code_field)
        .map_or(true, FieldValue::is_absent)
    {
        tracing::warn!(field = %options.structure_code_field, "structure code unavailable");
    }
    let code = record
        .display(&options.structure_code_field, &options.missing_value_text)
        .trim();
    let code = if options.sanitize_filename {
        sanitize_component(code)
    } else {
        code.to_string()
    };

    let name = format!("{code} CRV {date}.{}", options.extension);
    name.nfc().collect()
}

/// Replace characters that cannot appear in a file name on common systems.
fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
