//! Runtime settings: where translations live, storage keys, logging.

mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    I18nSettings,
    LogSettings,
    ValidationError,
};
