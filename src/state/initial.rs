//! Startup hints for choosing the first locale.

use crate::locale::{
    Locale,
    detect_locale,
};
use crate::server::RequestLocaleHints;

/// What the environment tells us before any locale has been chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialLocaleHints {
    /// Value of the locale cookie written during server rendering.
    pub cookie: Option<String>,
    /// Language tags the user agent declares, best first.
    pub languages: Vec<String>,
}

impl InitialLocaleHints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints carried over from a server-rendered request.
    #[must_use]
    pub fn from_request(request: &RequestLocaleHints, cookie_name: &str) -> Self {
        Self {
            cookie: request.cookie_locale(cookie_name).map(|locale| locale.code().to_string()),
            languages: request.languages(),
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, value: impl Into<String>) -> Self {
        self.cookie = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Supported locale named by the cookie.
    pub(super) fn cookie_locale(&self) -> Option<Locale> {
        self.cookie.as_deref().and_then(Locale::from_code)
    }

    /// First supported declared language.
    pub(super) fn detected_locale(&self) -> Option<Locale> {
        detect_locale(&self.languages)
    }
}
