//! First-record extraction with calamine.

use crate::error::{Error, Result};
use crate::model::{FieldValue, Record};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, instrument};

/// Date layout of pre-formatted date cells.
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Floats beyond this magnitude are not printed as integers.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Read the first data row of the first worksheet of a workbook file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_first_record(path: impl AsRef<Path>) -> Result<Record> {
    let workbook = open_workbook_auto(path.as_ref())?;
    first_record(workbook)
}

/// Read the first data row of the first worksheet of an in-memory workbook.
pub fn read_first_record_from_bytes(data: Vec<u8>) -> Result<Record> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
    first_record(workbook)
}

fn first_record<RS: Read + Seek>(mut workbook: calamine::Sheets<RS>) -> Result<Record> {
    let range = workbook.worksheet_range_at(0).ok_or(Error::NoWorksheet)??;
    record_from_range(&range)
}

fn record_from_range(range: &Range<Data>) -> Result<Record> {
    let mut rows = range.rows();
    let header_row = rows.next().ok_or(Error::NoRecord)?;
    // Fully blank rows are skipped.
    let value_row = rows
        .find(|row| row.iter().any(|cell| !cell_value(cell).is_absent()))
        .ok_or(Error::NoRecord)?;

    let headers = header_names(header_row);
    debug!(columns = headers.len(), "header row read");

    Ok(headers
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, value_row.get(i).map_or(FieldValue::Missing, cell_value)))
        .collect())
}

/// Header names: blank headers become `Unnamed: {i}`, repeated names get a
/// `.1`, `.2`, ... suffix.
fn header_names(row: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(row.len());
    for (i, cell) in row.iter().enumerate() {
        let base = match cell_value(cell) {
            FieldValue::Text(text) if !text.trim().is_empty() => text,
            _ => format!("Unnamed: {i}"),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}

/// Convert a cell into a field value.
fn cell_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty | Data::Error(_) => FieldValue::Missing,
        Data::String(s) if s.trim().is_empty() => FieldValue::Missing,
        Data::String(s) => FieldValue::from(s.as_str()),
        Data::Int(i) => FieldValue::text(i.to_string()),
        Data::Float(f) => format_float(*f).map_or(FieldValue::Missing, FieldValue::text),
        Data::Bool(b) => FieldValue::text(if *b { "True" } else { "False" }),
        Data::DateTime(dt) if dt.is_duration() => {
            format_float(dt.as_f64()).map_or(FieldValue::Missing, FieldValue::text)
        }
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => FieldValue::text(datetime.format(DATE_FORMAT).to_string()),
            None => format_float(dt.as_f64()).map_or(FieldValue::Missing, FieldValue::text),
        },
        Data::DateTimeIso(s) => FieldValue::text(format_iso_date(s)),
        Data::DurationIso(s) => FieldValue::text(s.clone()),
    }
}

/// Integral floats print without a fractional part; NaN has no text.
fn format_float(value: f64) -> Option<String> {
    if value.is_nan() {
        None
    } else if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        Some(format!("{}", value as i64))
    } else {
        Some(value.to_string())
    }
}

fn format_iso_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return datetime.format(DATE_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format(DATE_FORMAT).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height.saturating_sub(1), width.saturating_sub(1)));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn test_header_names() {
        let names = header_names(&[s("Nom"), Data::Empty, s("Nom"), s("Nom"), Data::Int(2024)]);
        assert_eq!(names, vec!["Nom", "Unnamed: 1", "Nom.1", "Nom.2", "2024"]);
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Empty), FieldValue::Missing);
        assert_eq!(cell_value(&s("  ")), FieldValue::Missing);
        assert_eq!(cell_value(&s("nan")), FieldValue::Missing);
        assert_eq!(cell_value(&s("Dupont")), FieldValue::text("Dupont"));
        assert_eq!(cell_value(&Data::Int(42)), FieldValue::text("42"));
        assert_eq!(cell_value(&Data::Float(75001.0)), FieldValue::text("75001"));
        assert_eq!(cell_value(&Data::Float(2.5)), FieldValue::text("2.5"));
        assert_eq!(cell_value(&Data::Float(f64::NAN)), FieldValue::Missing);
        assert_eq!(cell_value(&Data::Bool(true)), FieldValue::text("True"));
        assert_eq!(
            cell_value(&Data::Error(calamine::CellErrorType::NA)),
            FieldValue::Missing
        );
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-06-05T00:00:00".to_string())),
            FieldValue::text("05/06/2024")
        );
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-06-05".to_string())),
            FieldValue::text("05/06/2024")
        );
        assert_eq!(
            cell_value(&Data::DurationIso("PT1H".to_string())),
            FieldValue::text("PT1H")
        );
    }

    #[test]
    fn test_record_from_range() {
        let range = range(vec![
            vec![s("Nom"), s("Code de la structure"), s("Tel")],
            vec![s("Les Amis"), s("A123"), Data::Empty],
            vec![s("ignored"), s("B456"), s("0102")],
        ]);
        let record = record_from_range(&range).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Nom", "Code de la structure", "Tel"]);
        assert_eq!(record.get("Nom"), Some(&FieldValue::text("Les Amis")));
        assert!(record.get("Tel").unwrap().is_absent());
    }

    #[test]
    fn test_blank_rows_before_data_are_skipped() {
        let range = range(vec![
            vec![s("Nom"), s("Code de la structure")],
            vec![Data::Empty, s("  ")],
            vec![s("Les Amis"), s("A123")],
        ]);
        let record = record_from_range(&range).unwrap();
        assert_eq!(record.get("Nom"), Some(&FieldValue::text("Les Amis")));
        assert_eq!(record.get("Code de la structure"), Some(&FieldValue::text("A123")));
    }

    #[test]
    fn test_header_then_blank_rows_is_no_record() {
        let range = range(vec![vec![s("Nom")], vec![Data::Empty], vec![s("")]]);
        assert!(matches!(record_from_range(&range), Err(Error::NoRecord)));
    }

    #[test]
    fn test_header_only_is_no_record() {
        let range = range(vec![vec![s("Nom")]]);
        assert!(matches!(record_from_range(&range), Err(Error::NoRecord)));
        assert!(matches!(
            record_from_range(&Range::<Data>::empty()),
            Err(Error::NoRecord)
        ));
    }

    #[test]
    fn test_not_a_workbook() {
        let err = read_first_record_from_bytes(b"not a workbook".to_vec()).unwrap_err();
        assert!(matches!(err, Error::Spreadsheet(_)));
    }
}
