//! Parsed translation documents.

use std::collections::BTreeMap;

use serde_json::{
    Map,
    Value,
};

/// Translations for a single locale.
///
/// The document is an arbitrarily nested JSON object whose leaves are the
/// translated strings. It never changes after parsing; share it through an
/// `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationMap {
    /// Root object of the translation document.
    root: Map<String, Value>,
}

/// Error produced when a translation document cannot become a [`TranslationMap`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Translation document root must be an object, found {0}")]
    NotAnObject(&'static str),
}

impl TranslationMap {
    /// Parse a translation document.
    ///
    /// # Errors
    /// - The text is not valid JSON
    /// - The top-level value is not an object
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Build a map from an already parsed JSON value.
    ///
    /// # Errors
    /// Returns [`ParseError::NotAnObject`] when the value is not an object.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ParseError::NotAnObject(json_kind(&other))),
        }
    }

    #[must_use]
    pub const fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of string leaves in the document.
    #[must_use]
    pub fn key_count(&self) -> usize {
        /// String leaves below `map`.
        fn count(map: &Map<String, Value>) -> usize {
            map.values()
                .map(|value| match value {
                    Value::String(_) => 1,
                    Value::Object(nested) => count(nested),
                    _ => 0,
                })
                .sum()
        }
        count(&self.root)
    }

    /// Flatten every string leaf into a `separator`-joined key map.
    ///
    /// Non-string leaves (numbers, arrays, ...) are not translations and are
    /// skipped.
    ///
    /// # Examples
    /// ```
    /// use portfolio_i18n::translation::TranslationMap;
    ///
    /// let map = TranslationMap::parse(r#"{"nav": {"dashboards": "Dashboards"}}"#).unwrap();
    /// let flat = map.flatten_keys(".");
    /// assert_eq!(flat.get("nav.dashboards").map(String::as_str), Some("Dashboards"));
    /// ```
    #[must_use]
    pub fn flatten_keys(&self, separator: &str) -> BTreeMap<String, String> {
        let mut result = BTreeMap::new();
        flatten_object(&self.root, separator, None, &mut result);
        result
    }
}

impl TryFrom<Value> for TranslationMap {
    type Error = ParseError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Recursive worker for [`TranslationMap::flatten_keys`].
fn flatten_object(
    map: &Map<String, Value>,
    separator: &str,
    prefix: Option<&str>,
    result: &mut BTreeMap<String, String>,
) {
    for (key, value) in map {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
        match value {
            Value::Object(nested) => flatten_object(nested, separator, Some(&full_key), result),
            Value::String(text) => {
                result.insert(full_key, text.clone());
            }
            _ => {}
        }
    }
}

/// Human-readable JSON type name used in error messages.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
