//! Fill options configuration.

use crate::model::MISSING_VALUE_TEXT;

/// Accent color applied to inserted values (RGB 128, 0, 128).
pub const DEFAULT_ACCENT_COLOR: &str = "800080";

/// Filename segment used when the visit date cannot be read.
pub const UNDEFINED_DATE_TEXT: &str = "non_défini";

/// Field holding the structure code, first part of the output filename.
pub const STRUCTURE_CODE_FIELD: &str = "Code de la structure";

/// Field holding the last visit date, last part of the output filename.
pub const VISIT_DATE_FIELD: &str = "Date de la dernière visite";

/// Options controlling how a template is filled and how the output is named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOptions {
    /// Hex RGB color of inserted values, without `#`
    pub accent_color: String,

    /// Render inserted values in bold
    pub bold_values: bool,

    /// Text inserted for absent values
    pub missing_value_text: String,

    /// Filename segment used when the visit date is missing or invalid
    pub undefined_date_text: String,

    /// Record field holding the structure code
    pub structure_code_field: String,

    /// Record field holding the last visit date (`DD/MM/YYYY`)
    pub visit_date_field: String,

    /// Opening delimiter of placeholder tokens
    pub token_open: String,

    /// Closing delimiter of placeholder tokens
    pub token_close: String,

    /// Also substitute in page headers and footers
    pub include_headers_footers: bool,

    /// Replace characters that are not allowed in file names
    pub sanitize_filename: bool,

    /// Extension of the output filename, without the dot
    pub extension: String,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            bold_values: true,
            missing_value_text: MISSING_VALUE_TEXT.to_string(),
            undefined_date_text: UNDEFINED_DATE_TEXT.to_string(),
            structure_code_field: STRUCTURE_CODE_FIELD.to_string(),
            visit_date_field: VISIT_DATE_FIELD.to_string(),
            token_open: "<<".to_string(),
            token_close: ">>".to_string(),
            include_headers_footers: false,
            sanitize_filename: true,
            extension: "docx".to_string(),
        }
    }
}

impl FillOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accent color. A leading `#` is accepted and stripped; the
    /// value is stored upper-case.
    pub fn with_accent_color(mut self, color: impl AsRef<str>) -> Self {
        self.accent_color = color.as_ref().trim_start_matches('#').to_uppercase();
        self
    }

    /// Enable or disable bold on inserted values.
    pub fn with_bold_values(mut self, bold: bool) -> Self {
        self.bold_values = bold;
        self
    }

    /// Set the text inserted for absent values.
    pub fn with_missing_value_text(mut self, text: impl Into<String>) -> Self {
        self.missing_value_text = text.into();
        self
    }

    /// Set the filename segment used for an unreadable visit date.
    pub fn with_undefined_date_text(mut self, text: impl Into<String>) -> Self {
        self.undefined_date_text = text.into();
        self
    }

    /// Set the field names used to derive the output filename.
    pub fn with_filename_fields(
        mut self,
        structure_code: impl Into<String>,
        visit_date: impl Into<String>,
    ) -> Self {
        self.structure_code_field = structure_code.into();
        self.visit_date_field = visit_date.into();
        self
    }

    /// Set the placeholder delimiters.
    pub fn with_token_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.token_open = open.into();
        self.token_close = close.into();
        self
    }

    /// Also fill page headers and footers.
    pub fn with_headers_footers(mut self, include: bool) -> Self {
        self.include_headers_footers = include;
        self
    }

    /// Enable or disable filename sanitization.
    pub fn with_sanitize_filename(mut self, sanitize: bool) -> Self {
        self.sanitize_filename = sanitize;
        self
    }

    /// Set the output extension.
    pub fn with_extension(mut self, extension: impl AsRef<str>) -> Self {
        self.extension = extension.as_ref().trim_start_matches('.').to_string();
        self
    }

    /// The placeholder token for a field name.
    pub fn token(&self, key: &str) -> String {
        format!("{}{}{}", self.token_open, key, self.token_close)
    }

    /// Whether the accent color is a six-digit hex value.
    pub fn has_valid_accent_color(&self) -> bool {
        self.accent_color.len() == 6 && self.accent_color.chars().all(|c| c.is_ascii_hexdigit())
    }
}
