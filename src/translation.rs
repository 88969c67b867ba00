//! Translation documents: loading, key lookup and interpolation.

mod interpolate;
mod loader;
mod map;
mod resolve;
mod source;

pub use interpolate::{
    ParamValue,
    Params,
    escape_html,
    interpolate,
};
pub use loader::{
    LoadError,
    TranslationCache,
    TranslationLoader,
};
pub use map::{
    ParseError,
    TranslationMap,
};
pub use resolve::{
    DEFAULT_KEY_SEPARATOR,
    resolve,
};
pub use source::{
    FsSource,
    LOCALE_PLACEHOLDER,
    SourceError,
    StaticSource,
    TranslationSource,
};

/// Resolve `key` against `primary`, then `fallback`, then return the key itself.
///
/// Interpolation runs only when `params` is given and non-empty.
#[must_use]
pub fn translate(
    primary: Option<&TranslationMap>,
    fallback: Option<&TranslationMap>,
    key: &str,
    params: Option<&Params>,
    separator: &str,
) -> String {
    let template = primary
        .and_then(|map| resolve(map, key, separator))
        .or_else(|| fallback.and_then(|map| resolve(map, key, separator)));

    let Some(template) = template else {
        tracing::debug!(key, "Translation key not found");
        return key.to_string();
    };

    match params {
        Some(params) if !params.is_empty() => interpolate(template, params).into_owned(),
        _ => template.to_string(),
    }
}
