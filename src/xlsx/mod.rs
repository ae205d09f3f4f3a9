//! Spreadsheet record reader.
//!
//! Reads the first data row of a workbook (`.xlsx`, `.xls`, `.xlsb`, `.ods`)
//! into a [`Record`](crate::model::Record), using the header row as field
//! names.
//!
//! # Example
//!
//! ```no_run
//! use gendoc::xlsx::read_first_record;
//!
//! let record = read_first_record("associations.xlsx")?;
//! for (field, value) in record.iter() {
//!     println!("{}: {:?}", field, value.as_text());
//! }
//! # Ok::<(), gendoc::Error>(())
//! ```

mod reader;

pub use reader::{read_first_record, read_first_record_from_bytes};
