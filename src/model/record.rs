//! The record used to fill a template.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Display text used when a field has no value.
pub const MISSING_VALUE_TEXT: &str = "non renseigné";

/// Textual encoding of an empty value in stringified tabular exports.
const NAN_SENTINEL: &str = "nan";

/// The value of one field of a record.
///
/// Absence is decided here, before any formatting happens, so the filler
/// never has to compare display strings against sentinels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    /// The field has no value.
    #[default]
    Missing,
    /// Pre-formatted display text.
    Text(String),
}

impl FieldValue {
    /// Build a value from already formatted text, keeping it verbatim.
    pub fn text(text: impl Into<String>) -> Self {
        FieldValue::Text(text.into())
    }

    /// Whether the value is semantically absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// The text to insert, or `missing_text` when absent.
    pub fn display<'a>(&'a self, missing_text: &'a str) -> &'a str {
        match self {
            FieldValue::Missing => missing_text,
            FieldValue::Text(text) => text,
        }
    }

    /// The text if present.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Text(text) => Some(text),
        }
    }
}

/// Raw strings coming from stringified tabular data: `""` and `"nan"` mean
/// "no value"; anything else is kept as is.
impl From<&str> for FieldValue {
    fn from(raw: &str) -> Self {
        if raw.is_empty() || raw == NAN_SENTINEL {
            FieldValue::Missing
        } else {
            FieldValue::Text(raw.to_string())
        }
    }
}

impl From<String> for FieldValue {
    fn from(raw: String) -> Self {
        if raw.is_empty() || raw == NAN_SENTINEL {
            FieldValue::Missing
        } else {
            FieldValue::Text(raw)
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::from)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_text().serialize(serializer)
    }
}

/// One row of tabular input: field names mapped to values, in column order.
///
/// Column order matters: the filler substitutes keys in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, or replace the value of an existing field in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Builder-style [`Record::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Display text of a field; a missing key or absent value gives `missing_text`.
    pub fn display<'a>(&'a self, key: &str, missing_text: &'a str) -> &'a str {
        self.get(key)
            .map_or(missing_text, |value| value.display(missing_text))
    }

    /// Field names in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Fields in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
