//! Where translation documents come from.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use futures::future::{
    BoxFuture,
    FutureExt,
};

use crate::locale::Locale;

/// Placeholder replaced by the locale code in file patterns.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// Failure to retrieve the raw text of a translation document.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Translation resource not found: {0}")]
    NotFound(String),

    #[error("Failed to read translation resource '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Retrieves raw translation documents by locale.
///
/// Implementations only fetch text; parsing and caching belong to
/// [`TranslationLoader`](super::TranslationLoader).
pub trait TranslationSource: Send + Sync + fmt::Debug {
    fn fetch(&self, locale: Locale) -> BoxFuture<'_, Result<String, SourceError>>;
}

/// Reads `<dir>/<pattern>` files, e.g. `locales/de.json`.
#[derive(Debug, Clone)]
pub struct FsSource {
    /// Directory holding the documents.
    dir: PathBuf,
    /// File name containing [`LOCALE_PLACEHOLDER`].
    file_pattern: String,
}

impl FsSource {
    /// `file_pattern` must contain `{locale}`; it is replaced by the locale code.
    pub fn new(dir: impl Into<PathBuf>, file_pattern: impl Into<String>) -> Self {
        Self { dir: dir.into(), file_pattern: file_pattern.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `locale`.
    #[must_use]
    pub fn path_for(&self, locale: Locale) -> PathBuf {
        self.dir.join(self.file_pattern.replace(LOCALE_PLACEHOLDER, locale.code()))
    }
}

impl TranslationSource for FsSource {
    fn fetch(&self, locale: Locale) -> BoxFuture<'_, Result<String, SourceError>> {
        let path = self.path_for(locale);
        async move {
            tracing::debug!(locale = %locale, path = %path.display(), "Reading translation file");
            tokio::fs::read_to_string(&path).await.map_err(|source| {
                let path = path.display().to_string();
                if source.kind() == io::ErrorKind::NotFound {
                    SourceError::NotFound(path)
                } else {
                    SourceError::Io { path, source }
                }
            })
        }
        .boxed()
    }
}

/// In-memory documents, for embedded catalogs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    /// Raw documents by locale.
    documents: HashMap<Locale, String>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, locale: Locale, document: impl Into<String>) -> Self {
        self.documents.insert(locale, document.into());
        self
    }
}

impl TranslationSource for StaticSource {
    fn fetch(&self, locale: Locale) -> BoxFuture<'_, Result<String, SourceError>> {
        let result = self
            .documents
            .get(&locale)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("static:{locale}")));
        futures::future::ready(result).boxed()
    }
}
