//! # Server Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKBOOK_PORT=9000                                                │
//! │     STOCKBOOK_STORAGE_MODE=local_only                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $STOCKBOOK_CONFIG, or                                              │
//! │     ~/.config/stockbook/stockbook.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockbook.stockbook/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 8080
//!
//! [database]
//! path = "/var/lib/stockbook/stockbook.db"
//! max_connections = 5
//!
//! [storage]
//! mode = "primary_with_fallback"  # primary_with_fallback | local_only
//! cache_dir = "/var/lib/stockbook/cache"
//!
//! [report]
//! currency_prefix = "K "
//! utc_offset_minutes = 120
//! grouping = "product_name"       # product_name | product_id
//! ```

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use stockbook_core::money::{CurrencyFormat, DEFAULT_CURRENCY_PREFIX};
use stockbook_core::report::{Grouping, ReportOptions};
use stockbook_db::{DbConfig, StoragePolicy};

const CONFIG_FILE: &str = "stockbook.toml";
const DATABASE_FILE: &str = "stockbook.db";
const CACHE_DIR: &str = "cache";

/// Largest UTC offset in use anywhere (UTC+14).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub mode: StoragePolicy,

    /// Snapshot cache directory. Defaults to `cache/` in the data directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,

    /// Offset of the shop's local time from UTC. Week and day boundaries
    /// are taken in this offset.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    #[serde(default)]
    pub grouping: Grouping,
}

fn default_currency_prefix() -> String {
    DEFAULT_CURRENCY_PREFIX.to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            currency_prefix: default_currency_prefix(),
            utc_offset_minutes: 0,
            grouping: Grouping::default(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub report: ReportSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `path`, else `$STOCKBOOK_CONFIG`, else the platform default
    /// 3. Environment variables
    ///
    /// A missing file is only an error when it was named explicitly.
    pub fn load(path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = path.or_else(|| std::env::var("STOCKBOOK_CONFIG").ok().map(PathBuf::from));

        let mut config = match (explicit, Self::default_config_path()) {
            (Some(path), _) => Self::from_file(&path)?,
            (None, Some(path)) if path.exists() => Self::from_file(&path)?,
            (None, default_path) => {
                debug!(path = ?default_path, "Config file not found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `STOCKBOOK_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("STOCKBOOK_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("STOCKBOOK_PORT") {
            self.server.port = parse_env("STOCKBOOK_PORT", &port)?;
            debug!(port = self.server.port, "Overriding port from environment");
        }

        if let Some(path) = lookup("STOCKBOOK_DB_PATH") {
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(mode) = lookup("STOCKBOOK_STORAGE_MODE") {
            self.storage.mode = parse_env("STOCKBOOK_STORAGE_MODE", &mode)?;
            debug!(mode = %self.storage.mode, "Overriding storage mode from environment");
        }

        if let Some(dir) = lookup("STOCKBOOK_CACHE_DIR") {
            self.storage.cache_dir = Some(PathBuf::from(dir));
        }

        if let Some(prefix) = lookup("STOCKBOOK_CURRENCY_PREFIX") {
            self.report.currency_prefix = prefix;
        }

        if let Some(minutes) = lookup("STOCKBOOK_UTC_OFFSET_MINUTES") {
            self.report.utc_offset_minutes = parse_env("STOCKBOOK_UTC_OFFSET_MINUTES", &minutes)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_addr.parse::<IpAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                key: "server.bind_addr".to_string(),
                value: self.server.bind_addr.clone(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.report.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::InvalidValue {
                key: "report.utc_offset_minutes".to_string(),
                value: self.report.utc_offset_minutes.to_string(),
            });
        }

        Ok(())
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Resolved Settings
    // =========================================================================

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| data_dir().join(DATABASE_FILE))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.storage
            .cache_dir
            .clone()
            .unwrap_or_else(|| data_dir().join(CACHE_DIR))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path()).max_connections(self.database.max_connections)
    }

    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat::with_prefix(self.report.currency_prefix.clone())
    }

    /// The shop's local offset. Out-of-range values are rejected by
    /// [`AppConfig::validate`]; UTC is used if one slips through.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.report.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            grouping: self.report.grouping,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "stockbook", "stockbook")
}

/// Platform data directory, or the working directory when none exists.
fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

// =============================================================================
// Unit Tests
// =============================================================================
