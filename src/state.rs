//! Current-locale state and its transitions.
//!
//! `Uninitialized -> Loading(l) -> Ready(l)`, then
//! `Ready(a) -> Loading(b) -> Ready(b)` on every locale change. The state
//! lives in a `tokio::sync::watch` channel so every reader sees one
//! consistent snapshot.
//!
//! Every transition takes a ticket. Only the newest ticket may commit, so
//! when locale changes overlap the last request wins regardless of which
//! load finishes first.

mod initial;
mod subscribers;

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

pub use initial::InitialLocaleHints;
pub use subscribers::{
    Listener,
    SubscriptionId,
};
use subscribers::Subscribers;

use crate::locale::Locale;
use crate::storage::PreferenceStore;
use crate::translation::{
    LoadError,
    TranslationLoader,
    TranslationMap,
};

/// Lifecycle phase of the locale state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Loading(Locale),
    Ready(Locale),
}

/// Snapshot of the shared locale state.
#[derive(Debug, Clone, Default)]
pub struct LocaleState {
    /// Current lifecycle phase.
    phase: Phase,
    /// Last committed locale.
    locale: Option<Locale>,
    /// Translations of `locale`.
    translations: Option<Arc<TranslationMap>>,
    /// Default-locale translations used for keys missing in `translations`.
    fallback: Option<Arc<TranslationMap>>,
    /// Ticket of the newest transition; older tickets may not commit.
    ticket: u64,
}

impl LocaleState {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The committed locale, `None` until the first successful load.
    #[must_use]
    pub const fn locale(&self) -> Option<Locale> {
        self.locale
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading(_))
    }

    #[must_use]
    pub fn translations(&self) -> Option<&TranslationMap> {
        self.translations.as_deref()
    }

    #[must_use]
    pub fn fallback(&self) -> Option<&TranslationMap> {
        self.fallback.as_deref()
    }
}

/// Owns the [`LocaleState`] and performs locale changes.
pub struct LocaleManager {
    /// Loader for translation maps
    loader: TranslationLoader,
    /// Durable storage for the chosen locale
    store: Arc<dyn PreferenceStore>,
    /// Fallback locale
    default_locale: Locale,
    /// Storage key of the persisted locale
    storage_key: String,
    /// Current state
    state: watch::Sender<LocaleState>,
    /// Change listeners
    subscribers: Subscribers,
}

impl LocaleManager {
    pub fn new(
        loader: TranslationLoader,
        store: Arc<dyn PreferenceStore>,
        default_locale: Locale,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            store,
            default_locale,
            storage_key: storage_key.into(),
            state: watch::Sender::new(LocaleState::default()),
            subscribers: Subscribers::default(),
        }
    }

    #[must_use]
    pub const fn loader(&self) -> &TranslationLoader {
        &self.loader
    }

    #[must_use]
    pub const fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// Clone of the current state.
    #[must_use]
    pub fn state(&self) -> LocaleState {
        self.state.borrow().clone()
    }

    /// Run `f` against the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&LocaleState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receiver for async consumers that prefer awaiting changes.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<LocaleState> {
        self.state.subscribe()
    }

    pub fn subscribe(&self, listener: impl Fn(&LocaleState) + Send + Sync + 'static) -> SubscriptionId {
        self.subscribers.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Pick the startup locale.
    ///
    /// Order: stored preference, cookie, declared languages, default. A stored
    /// preference wins over the cookie: once the client has hydrated, its own
    /// storage is authoritative.
    #[must_use]
    pub fn resolve_initial_locale(&self, hints: &InitialLocaleHints) -> Locale {
        if let Some(locale) = self.stored_locale() {
            tracing::debug!(locale = %locale, "Initial locale from stored preference");
            return locale;
        }

        if let Some(locale) = hints.cookie_locale() {
            tracing::debug!(locale = %locale, "Initial locale from cookie");
            return locale;
        }

        if let Some(locale) = hints.detected_locale() {
            tracing::debug!(locale = %locale, "Initial locale from declared languages");
            return locale;
        }

        self.default_locale
    }

    /// Supported locale from durable storage; unreadable or unsupported values count as absent.
    fn stored_locale(&self) -> Option<Locale> {
        match self.store.get(&self.storage_key) {
            Ok(Some(value)) => {
                let locale = Locale::from_code(&value);
                if locale.is_none() {
                    tracing::debug!(value = %value, "Ignoring unsupported stored locale");
                }
                locale
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "Failed to read stored locale preference");
                None
            }
        }
    }

    /// Resolve the startup locale and load it.
    ///
    /// Falls back to the default locale when the chosen one fails to load.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the default locale cannot be loaded either;
    /// the state then stays in `Loading`.
    pub async fn initialize(&self, hints: &InitialLocaleHints) -> Result<Locale, LoadError> {
        let requested = self.resolve_initial_locale(hints);
        let ticket = self.begin_loading(requested);

        let (locale, translations) = match self.loader.load(requested).await {
            Ok(map) => (requested, map),
            Err(error) if requested != self.default_locale => {
                tracing::warn!(
                    locale = %requested,
                    %error,
                    "Falling back to default locale during initialization"
                );
                (self.default_locale, self.loader.load(self.default_locale).await?)
            }
            Err(error) => return Err(error),
        };
        let fallback = self.load_fallback(locale, &translations).await;

        if self.commit(ticket, |state| {
            state.phase = Phase::Ready(locale);
            state.locale = Some(locale);
            state.translations = Some(translations);
            state.fallback = fallback;
        }) {
            tracing::info!(locale = %locale, "Locale initialized");
        }
        Ok(locale)
    }

    /// Switch to the locale named by `code`.
    ///
    /// Unsupported codes are logged and ignored. On success the new locale
    /// is committed (unless a newer change superseded this one), persisted
    /// and announced to subscribers. A failed persist is logged only.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the translations cannot be loaded; the
    /// state keeps its last committed locale.
    pub async fn set_locale(&self, code: &str) -> Result<(), LoadError> {
        let Some(locale) = Locale::from_code(code) else {
            tracing::warn!(code, "Ignoring request for unsupported locale");
            return Ok(());
        };

        let ticket = self.begin_loading(locale);

        let translations = match self.loader.load(locale).await {
            Ok(map) => map,
            Err(error) => {
                self.commit(ticket, |state| {
                    if let Some(previous) = state.locale {
                        state.phase = Phase::Ready(previous);
                    }
                });
                return Err(error);
            }
        };
        let fallback = match self.with_state(|state| state.fallback.clone()) {
            Some(map) => Some(map),
            None => self.load_fallback(locale, &translations).await,
        };

        let committed = self.commit(ticket, |state| {
            state.phase = Phase::Ready(locale);
            state.locale = Some(locale);
            state.translations = Some(translations);
            state.fallback = fallback;
        });
        if !committed {
            tracing::debug!(locale = %locale, "Discarding superseded locale change");
            return Ok(());
        }

        if let Err(error) = self.store.set(&self.storage_key, locale.code()) {
            tracing::warn!(locale = %locale, %error, "Failed to persist locale preference");
        }
        tracing::info!(locale = %locale, "Locale changed");
        Ok(())
    }

    /// Default-locale map for fallback lookups; failures are logged, not fatal.
    async fn load_fallback(
        &self,
        locale: Locale,
        translations: &Arc<TranslationMap>,
    ) -> Option<Arc<TranslationMap>> {
        if locale == self.default_locale {
            return Some(Arc::clone(translations));
        }
        match self.loader.load(self.default_locale).await {
            Ok(map) => Some(map),
            Err(error) => {
                tracing::warn!(%error, "Default locale unavailable for fallback lookups");
                None
            }
        }
    }

    /// Take a new ticket and enter `Loading(locale)`.
    fn begin_loading(&self, locale: Locale) -> u64 {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            state.ticket += 1;
            ticket = state.ticket;
            state.phase = Phase::Loading(locale);
        });
        self.notify();
        ticket
    }

    /// Apply `change` if `ticket` is still the newest, then notify.
    fn commit(&self, ticket: u64, change: impl FnOnce(&mut LocaleState)) -> bool {
        let committed = self.state.send_if_modified(|state| {
            if state.ticket != ticket {
                return false;
            }
            change(state);
            true
        });
        if committed {
            self.notify();
        }
        committed
    }

    /// Hand the current state to every listener.
    fn notify(&self) {
        let snapshot = self.state();
        self.subscribers.notify(&snapshot);
    }
}

impl fmt::Debug for LocaleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleManager")
            .field("default_locale", &self.default_locale)
            .field("storage_key", &self.storage_key)
            .field("state", &*self.state.borrow())
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
