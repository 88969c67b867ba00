//! Translation coverage against the default locale.
//!
//! Keys of the default locale are the canonical set; other locales should
//! (but need not) cover them.

use std::collections::BTreeSet;

use crate::config::I18nSettings;
use crate::locale::Locale;
use crate::translation::{
    LoadError,
    TranslationLoader,
    TranslationMap,
};

/// How well one locale covers the default locale's keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCoverage {
    pub locale: Locale,
    /// Number of keys in the default locale.
    pub total: usize,
    /// Default-locale keys this locale lacks, sorted.
    pub missing: Vec<String>,
    /// Keys only this locale has, sorted.
    pub extra: Vec<String>,
}

impl LocaleCoverage {
    /// Share of default-locale keys that are translated, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::float_arithmetic)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.total.saturating_sub(self.missing.len()) as f64 / self.total as f64
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Compare `map` (for `locale`) against `default_map`.
#[must_use]
pub fn compare(
    default_map: &TranslationMap,
    map: &TranslationMap,
    locale: Locale,
    separator: &str,
) -> LocaleCoverage {
    let expected: BTreeSet<String> = default_map.flatten_keys(separator).into_keys().collect();
    let actual: BTreeSet<String> = map.flatten_keys(separator).into_keys().collect();

    LocaleCoverage {
        locale,
        total: expected.len(),
        missing: expected.difference(&actual).cloned().collect(),
        extra: actual.difference(&expected).cloned().collect(),
    }
}

/// Coverage of every registry locale that loaded, plus the load failures.
#[derive(Debug, Default)]
pub struct CatalogReport {
    pub coverage: Vec<LocaleCoverage>,
    pub failures: Vec<LoadError>,
}

impl CatalogReport {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load every supported locale and compare it to the default locale.
///
/// When the default locale fails to load, only failures are reported.
pub async fn check_catalog(loader: &TranslationLoader, settings: &I18nSettings) -> CatalogReport {
    let mut report = CatalogReport::default();
    let default_locale = settings.default_locale();

    let default_map = match loader.load(default_locale).await {
        Ok(map) => Some(map),
        Err(error) => {
            report.failures.push(error);
            None
        }
    };

    for locale in Locale::ALL {
        if locale == default_locale {
            continue;
        }
        match loader.load(locale).await {
            Ok(map) => {
                if let Some(default_map) = &default_map {
                    report.coverage.push(compare(default_map, &map, locale, &settings.key_separator));
                }
            }
            Err(error) => report.failures.push(error),
        }
    }

    report
}
