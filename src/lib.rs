//! portfolio-i18n
//!
//! Locale selection, translation loading, key lookup and interpolation for a
//! multi-language web application, with a server-rendering variant.

pub mod config;
pub mod context;
pub mod coverage;
pub mod locale;
pub mod logging;
pub mod server;
pub mod state;
pub mod storage;
pub mod translation;

pub use context::{
    I18n,
    I18nBuilder,
};
pub use locale::Locale;
pub use translation::Params;
