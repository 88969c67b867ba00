//! Server-rendering variant: stateless, per-request translation.
//!
//! During server rendering there is no client storage yet, so the locale is
//! chosen from the request (cookie, then `Accept-Language`) and the
//! translations are served from the shared [`TranslationLoader`] cache.

mod request;

use std::sync::Arc;

pub use request::{
    COOKIE_MAX_AGE_SECS,
    RequestLocaleHints,
    locale_cookie,
    parse_cookie,
    resolve_request_locale,
};

use crate::config::I18nSettings;
use crate::locale::Locale;
use crate::translation::{
    LoadError,
    Params,
    TranslationLoader,
    TranslationMap,
    translate,
};

/// Translations for one server-rendered request.
#[derive(Debug, Clone)]
pub struct ServerTranslator {
    /// Locale chosen for the request.
    locale: Locale,
    /// Translations of `locale`.
    translations: Arc<TranslationMap>,
    /// Default-locale map; `None` when `locale` is the default.
    fallback: Option<Arc<TranslationMap>>,
    /// Separator between key segments.
    key_separator: String,
}

impl ServerTranslator {
    /// Resolve the request locale and load its translations.
    ///
    /// A locale that fails to load is replaced by the default locale.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the default locale itself cannot be loaded.
    pub async fn for_request(
        loader: &TranslationLoader,
        hints: &RequestLocaleHints,
        settings: &I18nSettings,
    ) -> Result<Self, LoadError> {
        let requested = resolve_request_locale(hints, settings);
        Self::for_locale(loader, requested, settings).await
    }

    /// Load translations for an explicit locale.
    ///
    /// The default-locale map is only used for fallback lookups; when it is
    /// broken the requested locale is still served without a fallback.
    ///
    /// # Errors
    /// Returns [`LoadError`] when neither the requested nor the default
    /// locale can be loaded.
    pub async fn for_locale(
        loader: &TranslationLoader,
        locale: Locale,
        settings: &I18nSettings,
    ) -> Result<Self, LoadError> {
        let default_locale = settings.default_locale();
        let key_separator = settings.key_separator.clone();

        let requested = match loader.load(locale).await {
            Ok(map) => map,
            Err(error) if locale != default_locale => {
                tracing::warn!(locale = %locale, %error, "Serving default locale after load failure");
                let translations = loader.load(default_locale).await?;
                return Ok(Self { locale: default_locale, translations, fallback: None, key_separator });
            }
            Err(error) => return Err(error),
        };

        let fallback = if locale == default_locale {
            None
        } else {
            match loader.load(default_locale).await {
                Ok(map) => Some(map),
                Err(error) => {
                    tracing::warn!(%error, "Default locale unavailable for fallback lookups");
                    None
                }
            }
        };

        Ok(Self { locale, translations: requested, fallback, key_separator })
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Translate `key`; see [`crate::context::I18n::t`] for the fallback rules.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translate(key, None)
    }

    /// Translate `key` and substitute `{name}` placeholders from `params`.
    #[must_use]
    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.translate(key, Some(params))
    }

    /// Look up `key` in the request and fallback maps.
    fn translate(&self, key: &str, params: Option<&Params>) -> String {
        translate(
            Some(&*self.translations),
            self.fallback.as_deref(),
            key,
            params,
            &self.key_separator,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::translation::StaticSource;

    fn loader() -> TranslationLoader {
        TranslationLoader::new(
            StaticSource::new()
                .with(Locale::En, r#"{"common": {"save": "Save", "hello": "Hello {name}"}}"#)
                .with(Locale::De, r#"{"common": {"hello": "Hallo {name}"}}"#)
                .with(Locale::Fr, "]"),
        )
    }

    #[tokio::test]
    async fn request_cookie_selects_locale() {
        let hints = RequestLocaleHints::new()
            .with_cookie_header("locale=de")
            .with_accept_language("fr-FR");

        let translator =
            ServerTranslator::for_request(&loader(), &hints, &I18nSettings::default()).await.unwrap();

        assert_eq!(translator.locale(), Locale::De);
        let params = Params::new().with("name", "Zoë");
        assert_eq!(translator.t_with("common.hello", &params), "Hallo Zoë");
        assert_eq!(translator.t("common.save"), "Save");
        assert_eq!(translator.t("common.missing"), "common.missing");
    }

    #[tokio::test]
    async fn broken_locale_degrades_to_default() {
        let hints = RequestLocaleHints::new().with_accept_language("fr");

        let translator =
            ServerTranslator::for_request(&loader(), &hints, &I18nSettings::default()).await.unwrap();

        assert_eq!(translator.locale(), Locale::En);
        assert_eq!(translator.t("common.save"), "Save");
    }

    #[tokio::test]
    async fn missing_default_locale_is_an_error() {
        let settings = I18nSettings { default_locale: "pl".to_string(), ..I18nSettings::default() };

        let result =
            ServerTranslator::for_request(&loader(), &RequestLocaleHints::new(), &settings).await;

        assert!(matches!(result, Err(LoadError::Source { locale: Locale::Pl, .. })));
    }

    #[tokio::test]
    async fn broken_default_locale_still_serves_request_locale() {
        let loader = TranslationLoader::new(
            StaticSource::new()
                .with(Locale::En, "{ broken")
                .with(Locale::De, r#"{"common": {"save": "Speichern"}}"#),
        );
        let hints = RequestLocaleHints::new().with_cookie_header("locale=de");

        let translator =
            ServerTranslator::for_request(&loader, &hints, &I18nSettings::default()).await.unwrap();

        assert_eq!(translator.locale(), Locale::De);
        assert_eq!(translator.t("common.save"), "Speichern");
        assert_eq!(translator.t("common.cancel"), "common.cancel");
    }

    #[tokio::test]
    async fn request_fails_only_when_no_locale_loads() {
        let loader = TranslationLoader::new(
            StaticSource::new().with(Locale::En, "{ broken").with(Locale::De, "]"),
        );
        let hints = RequestLocaleHints::new().with_accept_language("de");

        let result = ServerTranslator::for_request(&loader, &hints, &I18nSettings::default()).await;

        assert!(matches!(result, Err(LoadError::Parse { locale: Locale::En, .. })));
    }

    #[googletest::test]
    fn requests_share_the_loader_cache() {
        let loader = loader();
        let settings = I18nSettings::default();
        let hints = RequestLocaleHints::new().with_accept_language("de");

        tokio_test::block_on(ServerTranslator::for_request(&loader, &hints, &settings)).unwrap();

        expect_that!(loader.cache().cached_locales(), elements_are![eq(&Locale::En), eq(&Locale::De)]);
    }
}
