use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale::Locale;
use crate::translation::LOCALE_PLACEHOLDER;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "log.filter")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Directory holding one translation document per locale.
    pub locales_dir: String,
    /// File name (relative to `locales_dir`) with a `{locale}` placeholder.
    pub file_pattern: String,

    pub default_locale: String,
    pub key_separator: String,

    /// Key under which the chosen locale is persisted on the client.
    pub storage_key: String,
    /// Cookie carrying the locale during server rendering.
    pub cookie_name: String,

    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
    /// Log file path. Logs go to stderr when unset.
    pub file: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { filter: "info".to_string(), file: None }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            locales_dir: "locales".to_string(),
            file_pattern: "{locale}.json".to_string(),
            default_locale: crate::locale::DEFAULT_LOCALE.code().to_string(),
            key_separator: ".".to_string(),
            storage_key: "preferredLocale".to_string(),
            cookie_name: "locale".to_string(),
            log: LogSettings::default(),
        }
    }
}

impl I18nSettings {
    /// The configured default locale.
    ///
    /// Falls back to [`crate::locale::DEFAULT_LOCALE`] for settings that were
    /// never validated.
    #[must_use]
    pub fn default_locale(&self) -> Locale {
        Locale::from_code(&self.default_locale).unwrap_or_default()
    }

    /// # Errors
    /// - Required field is empty
    /// - Default locale outside the registry
    /// - File pattern without a `{locale}` placeholder
    /// - Invalid cookie name
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if Locale::from_code(&self.default_locale).is_none() {
            let supported =
                Locale::ALL.iter().map(|locale| locale.code()).collect::<Vec<_>>().join(", ");
            errors.push(ValidationError::new(
                "defaultLocale",
                format!(
                    "Unsupported locale '{}'. Supported locales: {supported}",
                    self.default_locale
                ),
            ));
        }

        if self.locales_dir.is_empty() {
            errors.push(ValidationError::new(
                "localesDir",
                "The directory cannot be empty. Example: \"locales\"",
            ));
        }

        if !self.file_pattern.contains(LOCALE_PLACEHOLDER) {
            errors.push(ValidationError::new(
                "filePattern",
                format!(
                    "The pattern must contain '{LOCALE_PLACEHOLDER}'. Example: \"{LOCALE_PLACEHOLDER}.json\""
                ),
            ));
        }

        if self.storage_key.trim().is_empty() {
            errors.push(ValidationError::new("storageKey", "The storage key cannot be empty"));
        }

        if !is_cookie_token(&self.cookie_name) {
            errors.push(ValidationError::new(
                "cookieName",
                format!(
                    "Invalid cookie name '{}'. Use letters, digits and '-', '_' or '.'",
                    self.cookie_name
                ),
            ));
        }

        if self.log.filter.trim().is_empty() {
            errors.push(ValidationError::new(
                "log.filter",
                "The filter cannot be empty. Example: \"info\" or \"portfolio_i18n=debug\"",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Conservative subset of the RFC 6265 cookie-name token.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = I18nSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLocale": "de", "log": {"file": "i18n.log"}}"#;

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale(), eq(Locale::De));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.log.filter, eq("info"));
        assert_that!(settings.log.file, some(eq("i18n.log")));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.locales_dir, eq("locales"));
        assert_that!(settings.file_pattern, eq("{locale}.json"));
        assert_that!(settings.storage_key, eq("preferredLocale"));
        assert_that!(settings.cookie_name, eq("locale"));
        assert_that!(settings.default_locale(), eq(Locale::En));
    }

    #[rstest]
    #[case::empty_separator(r#"{"keySeparator": ""}"#, "keySeparator")]
    #[case::unknown_default(r#"{"defaultLocale": "ja"}"#, "defaultLocale")]
    #[case::regional_default(r#"{"defaultLocale": "de-CH"}"#, "defaultLocale")]
    #[case::empty_dir(r#"{"localesDir": ""}"#, "localesDir")]
    #[case::pattern_without_placeholder(r#"{"filePattern": "messages.json"}"#, "filePattern")]
    #[case::blank_storage_key(r#"{"storageKey": "  "}"#, "storageKey")]
    #[case::cookie_with_space(r#"{"cookieName": "my locale"}"#, "cookieName")]
    #[case::cookie_with_separator(r#"{"cookieName": "a;b"}"#, "cookieName")]
    #[case::empty_filter(r#"{"log": {"filter": ""}}"#, "log.filter")]
    fn validate_rejects_invalid_field(#[case] json: &str, #[case] field: &str) {
        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        let errors = settings.validate().unwrap_err();

        assert_that!(errors.len(), eq(1));
        assert_that!(errors[0].field_path, eq(field));
    }

    #[rstest]
    fn validate_collects_every_error() {
        let settings = I18nSettings {
            key_separator: String::new(),
            default_locale: "xx".to_string(),
            cookie_name: String::new(),
            ..I18nSettings::default()
        };

        let errors = settings.validate().unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field_path.as_str()).collect();
        assert_that!(fields, elements_are![eq(&"keySeparator"), eq(&"defaultLocale"), eq(&"cookieName")]);
    }

    #[rstest]
    fn config_error_lists_validation_errors() {
        let error = ConfigError::ValidationErrors(vec![
            ValidationError::new("keySeparator", "empty"),
            ValidationError::new("cookieName", "invalid"),
        ]);

        let message = error.to_string();

        assert_that!(message, contains_substring("1. keySeparator - empty"));
        assert_that!(message, contains_substring("2. cookieName - invalid"));
    }

    #[rstest]
    fn default_locale_falls_back_for_unvalidated_settings() {
        let settings = I18nSettings { default_locale: "xx".to_string(), ..I18nSettings::default() };

        assert_that!(settings.default_locale(), eq(Locale::En));
    }
}
