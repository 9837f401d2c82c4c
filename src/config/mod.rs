//! Configuration layer: typed settings with layered precedence (file → env).
//!
//! Settings load from an optional `vetrina.toml` next to the process, then
//! `VETRINA_*` environment variables (double underscore as the section
//! separator, e.g. `VETRINA_CACHE__ENABLED=false`). Every field has a
//! compiled-in default so an empty deployment still starts.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const LOCAL_CONFIG_BASENAME: &str = "vetrina";
const ENV_PREFIX: &str = "VETRINA";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_ADMIN_PAGE_SIZE: usize = 10;
const DEFAULT_PAGE_SIZE: usize = 20;
const DEFAULT_LOAD_MORE_PAGE_SIZE: usize = 12;
const DEFAULT_FEATURED_LIMIT: usize = 4;
const DEFAULT_RELATED_LIMIT: usize = 4;
const DEFAULT_RECOMMENDED_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),
}

/// Root settings for the catalog core.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
    pub assets: AssetSettings,
    pub admin: AdminSettings,
    pub storefront: StorefrontSettings,
}

/// Verbosity and output shape of the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

/// Mirrors [`crate::cache::CacheConfig`]; the cache constructs its own copy
/// from this section at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub single_flight: bool,
    pub category_list_ttl_secs: u64,
    pub featured_ttl_secs: u64,
    pub product_ttl_secs: u64,
    pub category_ttl_secs: u64,
    pub related_ttl_secs: u64,
    pub catalog_ttl_secs: u64,
    pub product_limit: usize,
    pub category_limit: usize,
    pub related_limit: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let defaults = crate::cache::CacheConfig::default();
        Self {
            enabled: defaults.enabled,
            single_flight: defaults.single_flight,
            category_list_ttl_secs: defaults.category_list_ttl_secs,
            featured_ttl_secs: defaults.featured_ttl_secs,
            product_ttl_secs: defaults.product_ttl_secs,
            category_ttl_secs: defaults.category_ttl_secs,
            related_ttl_secs: defaults.related_ttl_secs,
            catalog_ttl_secs: defaults.catalog_ttl_secs,
            product_limit: defaults.product_limit,
            category_limit: defaults.category_limit,
            related_limit: defaults.related_limit,
        }
    }
}

/// Where uploaded images land.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub upload_dir: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
        }
    }
}

/// The single-admin identity and the inventory view.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Shared secret for the admin gate. Empty locks every mutation out.
    pub token: String,
    /// Rows per admin inventory page.
    pub page_size: usize,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            page_size: DEFAULT_ADMIN_PAGE_SIZE,
        }
    }
}

/// Shopper-facing listing dimensions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorefrontSettings {
    /// Items per catalog/search page.
    pub page_size: usize,
    /// Items per "load more" fetch on category pages.
    pub load_more_page_size: usize,
    /// Length of the landing-page featured strip.
    pub featured_limit: usize,
    /// Length of the related-products strip on detail pages.
    pub related_limit: usize,
    /// Length of the recommendation tail on the shuffled browse view.
    pub recommended_limit: usize,
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            load_more_page_size: DEFAULT_LOAD_MORE_PAGE_SIZE,
            featured_limit: DEFAULT_FEATURED_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
            recommended_limit: DEFAULT_RECOMMENDED_LIMIT,
        }
    }
}

/// Load settings with layered precedence: optional file, then environment.
pub fn load(config_file: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut builder = Config::builder();

    builder = match config_file {
        Some(path) => builder.add_source(File::from(path)),
        None => builder.add_source(
            File::with_name(LOCAL_CONFIG_BASENAME)
                .format(FileFormat::Toml)
                .required(false),
        ),
    };

    let settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
