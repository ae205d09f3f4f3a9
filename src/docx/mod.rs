//! Word (DOCX/DOTX) template support.
//!
//! This module opens Word packages, projects their body into the document
//! model and fills `<<Field>>` placeholders with record values.

mod filler;
mod template;
mod wordml;
mod xml;

pub use filler::{find_placeholders, FillReport};
pub use template::Template;
