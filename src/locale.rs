//! Supported-locale registry.
//!
//! The registry is closed: a code that is not listed here is never a valid
//! [`Locale`], and every string entering the system goes through
//! [`Locale::from_code`] before it can be used.

mod detect;

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

pub use detect::{
    detect_locale,
    normalize_language_tag,
    parse_accept_language,
};

/// Locale used when no preference or detected language is supported.
pub const DEFAULT_LOCALE: Locale = Locale::En;

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    /// English
    En,
    /// German
    De,
    /// French
    Fr,
    /// Spanish
    Es,
    /// Polish
    Pl,
    /// Swiss German (regional dialect)
    Gsw,
}

/// Registry record describing a supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocaleInfo {
    pub code: &'static str,
    /// English name of the language.
    pub name: &'static str,
    /// Name of the language in the language itself.
    pub native_name: &'static str,
}

impl Locale {
    /// Every supported locale, in registry order.
    pub const ALL: [Self; 6] = [Self::En, Self::De, Self::Fr, Self::Es, Self::Pl, Self::Gsw];

    /// Looks up a locale by its code.
    ///
    /// Matching is ASCII case-insensitive and ignores surrounding whitespace.
    /// Regional tags such as `de-CH` are *not* accepted here; use
    /// [`normalize_language_tag`] first when handling declared languages.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|locale| locale.code().eq_ignore_ascii_case(code))
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        self.info().code
    }

    #[must_use]
    pub const fn info(self) -> LocaleInfo {
        match self {
            Self::En => LocaleInfo { code: "en", name: "English", native_name: "English" },
            Self::De => LocaleInfo { code: "de", name: "German", native_name: "Deutsch" },
            Self::Fr => LocaleInfo { code: "fr", name: "French", native_name: "Français" },
            Self::Es => LocaleInfo { code: "es", name: "Spanish", native_name: "Español" },
            Self::Pl => LocaleInfo { code: "pl", name: "Polish", native_name: "Polski" },
            Self::Gsw => {
                LocaleInfo { code: "gsw", name: "Swiss German", native_name: "Schwiizerdütsch" }
            }
        }
    }

    /// Returns the whole registry as records.
    #[must_use]
    pub fn registry() -> Vec<LocaleInfo> {
        Self::ALL.into_iter().map(Self::info).collect()
    }
}

impl Default for Locale {
    fn default() -> Self {
        DEFAULT_LOCALE
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing a code outside the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported locale '{0}'")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
