//! Translation loading with a per-loader cache.

use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

use tokio::sync::OnceCell;

use super::map::ParseError;
use super::source::{
    SourceError,
    TranslationSource,
};
use super::TranslationMap;
use crate::locale::Locale;

/// Failure to produce a [`TranslationMap`] for a locale.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to retrieve translations for '{locale}': {source}")]
    Source {
        locale: Locale,
        #[source]
        source: SourceError,
    },

    #[error("Malformed translations for '{locale}': {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    #[must_use]
    pub const fn locale(&self) -> Locale {
        match self {
            Self::Source { locale, .. } | Self::Parse { locale, .. } => *locale,
        }
    }
}

/// Cache slot for one locale. Initialized at most once per slot.
type Slot = Arc<OnceCell<Arc<TranslationMap>>>;

/// Per-locale translation cache.
///
/// Each locale owns a slot that is filled at most once, so concurrent loads
/// of the same locale share one fetch. A failed fetch leaves the slot empty.
#[derive(Debug, Default)]
pub struct TranslationCache {
    /// Slots by locale; replaced wholesale on clear.
    entries: Mutex<HashMap<Locale, Slot>>,
}

impl TranslationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the entries, recovering from a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, HashMap<Locale, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the slot for `locale`, creating an empty one when absent.
    fn slot(&self, locale: Locale) -> Slot {
        Arc::clone(self.lock().entry(locale).or_default())
    }

    /// Cached map for `locale`, if a load has completed.
    #[must_use]
    pub fn get(&self, locale: Locale) -> Option<Arc<TranslationMap>> {
        self.lock().get(&locale).and_then(|slot| slot.get().cloned())
    }

    #[must_use]
    pub fn contains(&self, locale: Locale) -> bool {
        self.lock().get(&locale).is_some_and(|slot| slot.initialized())
    }

    /// Locales with a completed load, in registry order.
    #[must_use]
    pub fn cached_locales(&self) -> Vec<Locale> {
        let entries = self.lock();
        Locale::ALL
            .into_iter()
            .filter(|locale| entries.get(locale).is_some_and(|slot| slot.initialized()))
            .collect()
    }

    /// Drop every cached map.
    ///
    /// Loads already in flight finish into their detached slots and are not
    /// visible through this cache afterwards.
    pub fn clear(&self) {
        *self.lock() = HashMap::new();
    }
}

/// Loads translation maps from a [`TranslationSource`] and caches them.
///
/// Clones share the source and the cache.
#[derive(Debug, Clone)]
pub struct TranslationLoader {
    /// Where documents come from.
    source: Arc<dyn TranslationSource>,
    /// Parsed maps by locale.
    cache: Arc<TranslationCache>,
}

impl TranslationLoader {
    /// Create a loader with its own empty cache.
    pub fn new(source: impl TranslationSource + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    #[must_use]
    pub fn from_arc(source: Arc<dyn TranslationSource>) -> Self {
        Self { source, cache: Arc::new(TranslationCache::new()) }
    }

    /// Load the translations for `locale`, serving from the cache when possible.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the document cannot be fetched or parsed.
    /// Nothing is cached in that case.
    pub async fn load(&self, locale: Locale) -> Result<Arc<TranslationMap>, LoadError> {
        let slot = self.cache.slot(locale);
        if let Some(map) = slot.get() {
            tracing::debug!(locale = %locale, "Translation cache hit");
            return Ok(Arc::clone(map));
        }

        let map = slot.get_or_try_init(|| self.fetch_and_parse(locale)).await?;
        Ok(Arc::clone(map))
    }

    /// Fetch and parse without touching the cache.
    async fn fetch_and_parse(&self, locale: Locale) -> Result<Arc<TranslationMap>, LoadError> {
        tracing::debug!(locale = %locale, "Fetching translations");

        let result = async {
            let text = self
                .source
                .fetch(locale)
                .await
                .map_err(|source| LoadError::Source { locale, source })?;
            TranslationMap::parse(&text).map_err(|source| LoadError::Parse { locale, source })
        }
        .await;

        match result {
            Ok(map) => {
                tracing::info!(locale = %locale, keys = map.key_count(), "Loaded translations");
                Ok(Arc::new(map))
            }
            Err(error) => {
                tracing::warn!(locale = %locale, %error, "Failed to load translations");
                Err(error)
            }
        }
    }

    #[must_use]
    pub fn is_cached(&self, locale: Locale) -> bool {
        self.cache.contains(locale)
    }

    pub fn clear_cache(&self) {
        tracing::debug!("Clearing translation cache");
        self.cache.clear();
    }

    #[must_use]
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }
}
