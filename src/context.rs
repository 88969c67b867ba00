//! The consumer-facing handle: `t`, `locale`, `is_loading`, `set_locale`.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::{
    ConfigError,
    I18nSettings,
};
use crate::locale::Locale;
use crate::state::{
    InitialLocaleHints,
    LocaleManager,
    LocaleState,
    SubscriptionId,
};
use crate::storage::{
    MemoryStore,
    PreferenceStore,
};
use crate::translation::{
    FsSource,
    LoadError,
    Params,
    TranslationLoader,
    TranslationSource,
    translate,
};

/// Shared i18n handle. Clones are cheap and observe the same state.
#[derive(Debug, Clone)]
pub struct I18n {
    /// Shared by every clone.
    inner: Arc<Inner>,
}

/// State behind an [`I18n`] handle.
#[derive(Debug)]
struct Inner {
    /// Owner of the locale state.
    manager: LocaleManager,
    /// Validated settings the context was built with.
    settings: I18nSettings,
}

impl I18n {
    #[must_use]
    pub fn builder() -> I18nBuilder {
        I18nBuilder::default()
    }

    /// Translate `key` in the current locale.
    ///
    /// Missing keys fall back to the default locale, then to `key` itself,
    /// so the result is always displayable.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translate(key, None)
    }

    /// Translate `key` and substitute `{name}` placeholders from `params`.
    ///
    /// Parameter values are HTML-escaped; unknown placeholders are kept as-is.
    #[must_use]
    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.translate(key, Some(params))
    }

    /// Look up `key` in the current and fallback maps.
    fn translate(&self, key: &str, params: Option<&Params>) -> String {
        self.inner.manager.with_state(|state| {
            translate(
                state.translations(),
                state.fallback(),
                key,
                params,
                &self.inner.settings.key_separator,
            )
        })
    }

    /// The current locale, or the default locale before initialization.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.inner
            .manager
            .with_state(LocaleState::locale)
            .unwrap_or_else(|| self.inner.manager.default_locale())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.manager.with_state(LocaleState::is_loading)
    }

    /// Choose and load the startup locale.
    ///
    /// # Errors
    /// Returns [`LoadError`] when not even the default locale can be loaded.
    pub async fn initialize(&self, hints: &InitialLocaleHints) -> Result<Locale, LoadError> {
        self.inner.manager.initialize(hints).await
    }

    /// Switch locale. Unsupported codes are ignored with a warning.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the new locale's translations fail to load;
    /// the current locale stays active.
    pub async fn set_locale(&self, code: &str) -> Result<(), LoadError> {
        self.inner.manager.set_locale(code).await
    }

    /// Register `listener`; it runs after every state transition.
    pub fn subscribe(&self, listener: impl Fn(&LocaleState) + Send + Sync + 'static) -> SubscriptionId {
        self.inner.manager.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.manager.unsubscribe(id)
    }

    #[must_use]
    pub fn watch(&self) -> watch::Receiver<LocaleState> {
        self.inner.manager.watch()
    }

    #[must_use]
    pub fn state(&self) -> LocaleState {
        self.inner.manager.state()
    }

    /// The underlying loader, for `is_cached` and `clear_cache`.
    #[must_use]
    pub fn loader(&self) -> &TranslationLoader {
        self.inner.manager.loader()
    }

    #[must_use]
    pub fn settings(&self) -> &I18nSettings {
        &self.inner.settings
    }
}

/// Builder for [`I18n`].
///
/// Without a source, translations are read from `settings.locales_dir`.
/// Without a store, preferences live in memory for the process lifetime.
#[derive(Debug, Default)]
pub struct I18nBuilder {
    /// Settings to validate and use.
    settings: I18nSettings,
    /// Loader to use instead of a filesystem one.
    loader: Option<TranslationLoader>,
    /// Preference store; in-memory when unset.
    store: Option<Arc<dyn PreferenceStore>>,
}

impl I18nBuilder {
    #[must_use]
    pub fn settings(mut self, settings: I18nSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl TranslationSource + 'static) -> Self {
        self.loader = Some(TranslationLoader::new(source));
        self
    }

    /// Use an existing loader, sharing its cache (e.g. with server rendering).
    #[must_use]
    pub fn loader(mut self, loader: TranslationLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    #[must_use]
    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// # Errors
    /// Returns [`ConfigError::ValidationErrors`] for invalid settings.
    pub fn build(self) -> Result<I18n, ConfigError> {
        self.settings.validate().map_err(ConfigError::ValidationErrors)?;

        let settings = self.settings;
        let loader = self.loader.unwrap_or_else(|| {
            TranslationLoader::new(FsSource::new(&settings.locales_dir, &settings.file_pattern))
        });
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let manager =
            LocaleManager::new(loader, store, settings.default_locale(), &settings.storage_key);

        tracing::debug!(default_locale = %settings.default_locale(), "i18n context created");
        Ok(I18n { inner: Arc::new(Inner { manager, settings }) })
    }
}
