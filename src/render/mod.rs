//! Output rendering for records and template documents.
//!
//! # Example
//!
//! ```no_run
//! use gendoc::render::{preview, to_json, JsonFormat, PreviewOptions};
//! use gendoc::xlsx::read_first_record;
//!
//! let record = read_first_record("associations.xlsx")?;
//!
//! // Aligned field listing
//! println!("{}", preview(&record, &PreviewOptions::default()));
//!
//! // JSON object in column order
//! let json = to_json(&record, JsonFormat::Pretty)?;
//! # Ok::<(), gendoc::Error>(())
//! ```

mod json;
mod preview;

pub use json::{document_to_json, to_json, JsonFormat};
pub use preview::{preview, PreviewOptions};
