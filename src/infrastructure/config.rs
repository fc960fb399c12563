//! Configuration infrastructure
//!
//! Contains configuration loading for the handset catalog scraper.
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. Built-in defaults (`#[serde(default)]` on every section)
//! 2. Optional config file (JSON, TOML or YAML by extension)
//! 3. `HANDSET_SCRAPER__<SECTION>__<KEY>` environment variables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use crate::domain::product::ContractType;
use crate::infrastructure::parsing::ParsingConfig;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "HANDSET_SCRAPER";

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for '{field}': {message}")]
    Validation { field: String, message: String },
}

impl ConfigError {
    fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output naming and destination bucket
    pub publish: PublishConfig,

    /// Target website
    pub site: SiteConfig,

    /// HTTP client settings
    pub http: HttpConfig,

    /// CSS selectors for listing tiles and detail tables
    pub selectors: ParsingConfig,

    /// Local object store
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where and under which name the dataset is published
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Object name prefix; the run date and `.json` are appended
    pub upload_prefix: String,

    /// Destination bucket
    pub bucket: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            upload_prefix: defaults::UPLOAD_PREFIX.to_string(),
            bucket: String::new(),
        }
    }
}

/// Website endpoints and segments to scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL, prepended verbatim to every product href
    pub base_url: String,

    /// Listing path with a `{contract_type}` placeholder
    pub listing_path: String,

    /// Segments scraped in order
    pub segments: Vec<ContractType>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: o2::BASE_URL.to_string(),
            listing_path: o2::LISTING_PATH.to_string(),
            segments: ContractType::ALL.to_vec(),
        }
    }
}

impl SiteConfig {
    /// Listing page URL for one segment
    pub fn listing_url(&self, segment: ContractType) -> String {
        format!(
            "{}{}",
            self.base_url,
            self.listing_path.replace("{contract_type}", segment.query_value())
        )
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Browser-identifying User-Agent sent with every request
    pub user_agent: String,

    /// Whole-request timeout; `None` leaves the client default (no timeout)
    pub timeout_seconds: Option<u64>,

    /// Follow HTTP redirects
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: None,
            follow_redirects: true,
        }
    }
}

/// Local object store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; buckets are subdirectories
    pub root_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root_dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(defaults::APP_DIR_NAME)
            .join("buckets");
        Self { root_dir }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; defaults to `logs` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Log file name
    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.publish.upload_prefix.trim().is_empty() {
            return Err(ConfigError::validation("publish.upload_prefix", "must not be empty"));
        }
        if self.publish.bucket.trim().is_empty() {
            return Err(ConfigError::validation("publish.bucket", "must not be empty"));
        }
        if self.publish.bucket.contains(['/', '\\']) || self.publish.bucket.starts_with('.') {
            return Err(ConfigError::validation("publish.bucket", "must be a plain bucket name"));
        }
        if let Err(e) = url::Url::parse(&self.site.base_url) {
            return Err(ConfigError::validation("site.base_url", e.to_string()));
        }
        if !self.site.listing_path.contains("{contract_type}") {
            return Err(ConfigError::validation(
                "site.listing_path",
                "must contain the {contract_type} placeholder",
            ));
        }
        if self.site.segments.is_empty() {
            return Err(ConfigError::validation("site.segments", "at least one segment is required"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::validation("http.user_agent", "must not be empty"));
        }
        if self.http.timeout_seconds == Some(0) {
            return Err(ConfigError::validation("http.timeout_seconds", "must be greater than 0"));
        }
        if let Err(e) = self.selectors.check() {
            return Err(ConfigError::validation("selectors", e.to_string()));
        }
        Ok(())
    }
}

/// Configuration manager for locating and loading settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Manager for the default config file location
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    /// Manager for an explicit config file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Load defaults, the config file (if present) and environment overrides
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let file_present = self.config_path.exists();
        let config = Self::load_from(Some(&self.config_path), ENV_PREFIX)?;

        if file_present {
            info!("Loaded configuration from: {:?}", self.config_path);
        } else {
            info!("Configuration file not found at {:?}, using defaults and environment", self.config_path);
        }
        Ok(config)
    }

    /// Build a validated config from an optional file and an environment prefix
    pub fn load_from(path: Option<&Path>, env_prefix: &str) -> Result<AppConfig, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }
}

/// O2 UK shop endpoints
pub mod o2 {
    /// Base URL, also the prefix of every product link
    pub const BASE_URL: &str = "https://www.o2.co.uk";

    /// Phone listing path; `{contract_type}` is the segment query value
    pub const LISTING_PATH: &str = "/shop/phones?contractType={contract_type}";
}

/// Default configuration values
pub mod defaults {
    /// Directory name under the platform config/data dirs
    pub const APP_DIR_NAME: &str = "handset-scraper";

    /// Default config file name
    pub const CONFIG_FILE_NAME: &str = "handset_scraper_config.json";

    /// Default object name prefix
    pub const UPLOAD_PREFIX: &str = "o2_phones";

    /// Desktop Chrome User-Agent the shop serves full listings to
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.81 Safari/537.36";

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;

    /// Default log file name
    pub const LOG_FILE_NAME: &str = "handset-scraper.log";
}
