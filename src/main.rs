//! Catalog checker: loads every locale and reports translation coverage.
//!
//! Usage: `portfolio-i18n [workspace_dir]`

use std::path::PathBuf;
use std::process::ExitCode;

use portfolio_i18n::config::ConfigManager;
use portfolio_i18n::coverage::check_catalog;
use portfolio_i18n::logging;
use portfolio_i18n::translation::{
    FsSource,
    TranslationLoader,
};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let workspace_root = std::env::args().nth(1).map(PathBuf::from);

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(workspace_root)?;
    let settings = config_manager.get_settings();
    let _guard = logging::init(&settings.log)?;

    let locales_path = config_manager.locales_path();
    tracing::info!(
        workspace = ?config_manager.workspace_root(),
        dir = %locales_path.display(),
        "Checking translation catalog"
    );
    let loader = TranslationLoader::new(FsSource::new(locales_path, &settings.file_pattern));

    let report = check_catalog(&loader, settings).await;

    for coverage in &report.coverage {
        tracing::info!(
            locale = %coverage.locale,
            translated = coverage.total.saturating_sub(coverage.missing.len()),
            total = coverage.total,
            ratio = coverage.ratio(),
            "Coverage"
        );
        for key in &coverage.missing {
            tracing::warn!(locale = %coverage.locale, key = %key, "Missing translation");
        }
        for key in &coverage.extra {
            tracing::debug!(locale = %coverage.locale, key = %key, "Key not present in default locale");
        }
    }
    for failure in &report.failures {
        tracing::error!(locale = %failure.locale(), error = %failure, "Locale failed to load");
    }

    Ok(if report.is_healthy() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
