//! Data model for records and template documents.
//!
//! A [`Record`] is the single spreadsheet row used to fill a template.
//! [`Document`] is a read-only projection of a template body (paragraphs,
//! tables, styled runs) used to inspect templates and generated output.

mod document;
mod paragraph;
mod record;
mod table;

pub use document::*;
pub use paragraph::*;
pub use record::*;
pub use table::*;
