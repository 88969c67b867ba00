//! Request-scoped locale hints: the locale cookie and `Accept-Language`.

use crate::config::I18nSettings;
use crate::locale::{
    Locale,
    detect_locale,
    parse_accept_language,
};

/// Lifetime of the locale cookie: one year.
pub const COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Raw header values relevant to locale selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLocaleHints {
    /// Value of the `Cookie` header.
    pub cookie_header: Option<String>,
    /// Value of the `Accept-Language` header.
    pub accept_language: Option<String>,
}

impl RequestLocaleHints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cookie_header(mut self, header: impl Into<String>) -> Self {
        self.cookie_header = Some(header.into());
        self
    }

    #[must_use]
    pub fn with_accept_language(mut self, header: impl Into<String>) -> Self {
        self.accept_language = Some(header.into());
        self
    }

    /// Supported locale named by the locale cookie, if any.
    #[must_use]
    pub fn cookie_locale(&self, cookie_name: &str) -> Option<Locale> {
        let value = parse_cookie(self.cookie_header.as_deref()?, cookie_name)?;
        let locale = Locale::from_code(value);
        if locale.is_none() {
            tracing::debug!(cookie = cookie_name, value, "Ignoring unsupported locale cookie");
        }
        locale
    }

    /// Declared language tags, best first.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.accept_language.as_deref().map(parse_accept_language).unwrap_or_default()
    }
}

/// Extract the value of cookie `name` from a `Cookie` header.
///
/// # Examples
/// ```
/// use portfolio_i18n::server::parse_cookie;
///
/// assert_eq!(parse_cookie("theme=dark; locale=de", "locale"), Some("de"));
/// assert_eq!(parse_cookie("theme=dark", "locale"), None);
/// ```
#[must_use]
pub fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"'))
    })
}

/// Pick the locale for a server-rendered request.
///
/// Order: locale cookie, then `Accept-Language` (primary subtags), then the
/// configured default.
#[must_use]
pub fn resolve_request_locale(hints: &RequestLocaleHints, settings: &I18nSettings) -> Locale {
    if let Some(locale) = hints.cookie_locale(&settings.cookie_name) {
        tracing::debug!(locale = %locale, "Locale from cookie");
        return locale;
    }

    if let Some(locale) = detect_locale(hints.languages()) {
        tracing::debug!(locale = %locale, "Locale from Accept-Language");
        return locale;
    }

    settings.default_locale()
}

/// Build a `Set-Cookie` header value persisting `locale`.
#[must_use]
pub fn locale_cookie(locale: Locale, settings: &I18nSettings) -> String {
    format!(
        "{}={}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax",
        settings.cookie_name,
        locale.code()
    )
}
