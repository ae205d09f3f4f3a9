//! Aligned text preview of a record.

use crate::model::{Record, MISSING_VALUE_TEXT};
use unicode_width::UnicodeWidthStr;

/// Options for [`preview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Text shown for absent values
    pub missing_value_text: String,

    /// Column separator between field names and values
    pub separator: String,

    /// Values wider than this many columns are cut with `…` (0 = no limit)
    pub max_value_width: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            missing_value_text: MISSING_VALUE_TEXT.to_string(),
            separator: " │ ".to_string(),
            max_value_width: 0,
        }
    }
}

impl PreviewOptions {
    /// Set the text shown for absent values.
    pub fn with_missing_value_text(mut self, text: impl Into<String>) -> Self {
        self.missing_value_text = text.into();
        self
    }

    /// Set the column separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Limit the display width of values.
    pub fn with_max_value_width(mut self, width: usize) -> Self {
        self.max_value_width = width;
        self
    }
}

/// Render a record as `field │ value` lines, field names padded to the same
/// display width.
///
/// Multi-line values continue under the value column.
pub fn preview(record: &Record, options: &PreviewOptions) -> String {
    let name_width = record.keys().map(UnicodeWidthStr::width).max().unwrap_or(0);
    let indent = " ".repeat(name_width) + &options.separator;

    let mut out = String::new();
    for (key, value) in record.iter() {
        let text = value.display(&options.missing_value_text);
        let padding = " ".repeat(name_width - key.width());

        for (i, line) in text.split('\n').enumerate() {
            if i == 0 {
                out.push_str(key);
                out.push_str(&padding);
                out.push_str(&options.separator);
            } else {
                out.push_str(&indent);
            }
            out.push_str(&truncate(line, options.max_value_width));
            out.push('\n');
        }
    }
    out
}

fn truncate(text: &str, max_width: usize) -> String {
    if max_width == 0 || text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}
