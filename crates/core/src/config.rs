//! Configuration management
//!
//! Loads and saves the s5 configuration file. The file is TOML, stored at
//! `<config dir>/s5/config.toml` unless a directory is given explicitly.
//!
//! Changes to schema_version require migration support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::DEFAULT_PAGE_SIZE;
use crate::validate::ExistenceCheck;

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Upper bound S3 places on keys per listing request
const MAX_PAGE_SIZE: i32 = 1000;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default output settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Storage endpoint settings
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Path resolution and listing behavior
    #[serde(default)]
    pub navigation: NavigationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            connection: ConnectionConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

/// Default settings for output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Output format: "human" or "json"
    #[serde(default = "default_output")]
    pub output: String,

    /// Color mode: "auto", "always", or "never"
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

/// Where and how to reach the object store
///
/// Credentials are not stored here; the AWS default provider chain
/// (environment, shared profile, instance metadata) supplies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Custom endpoint URL for S3-compatible services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// AWS region, also used as the location constraint for new buckets
    #[serde(default = "default_region")]
    pub region: String,

    /// Named profile from the shared AWS config files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Bucket lookup style: "auto", "path", or "dns"
    #[serde(default = "default_bucket_lookup")]
    pub bucket_lookup: String,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Read timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: default_region(),
            profile: None,
            bucket_lookup: default_bucket_lookup(),
            connect_timeout_ms: default_connect_timeout(),
            read_timeout_ms: default_read_timeout(),
        }
    }
}

impl ConnectionConfig {
    /// Whether requests should use path-style addressing
    pub fn force_path_style(&self) -> bool {
        match self.bucket_lookup.as_str() {
            "path" => true,
            "dns" => false,
            // Custom endpoints are usually S3-compatible servers without DNS-style routing
            _ => self.endpoint.is_some(),
        }
    }
}

/// Path resolution and listing behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// How object existence is decided
    #[serde(default)]
    pub existence_check: ExistenceCheck,

    /// Keys requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            existence_check: ExistenceCheck::default(),
            page_size: default_page_size(),
        }
    }
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_output() -> String {
    "human".to_string()
}

fn default_color() -> String {
    "auto".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket_lookup() -> String {
    "auto".to_string()
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_read_timeout() -> u64 {
    30000
}

fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

impl Config {
    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.defaults.output.as_str(), "human" | "json") {
            return Err(Error::Config(format!(
                "output must be human or json, got '{}'",
                self.defaults.output
            )));
        }

        if !matches!(self.defaults.color.as_str(), "auto" | "always" | "never") {
            return Err(Error::Config(format!(
                "color must be auto, always or never, got '{}'",
                self.defaults.color
            )));
        }

        if let Some(endpoint) = &self.connection.endpoint {
            url::Url::parse(endpoint)?;
        }

        if !matches!(
            self.connection.bucket_lookup.as_str(),
            "auto" | "path" | "dns"
        ) {
            return Err(Error::Config(format!(
                "bucket_lookup must be auto, path or dns, got '{}'",
                self.connection.bucket_lookup
            )));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.navigation.page_size) {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.navigation.page_size
            )));
        }

        Ok(())
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        Ok(Self::with_dir(config_dir.join("s5")))
    }

    /// Create a ConfigManager rooted at an explicit directory
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self::with_path(dir.as_ref().join(CONFIG_FILE))
    }

    /// Create a ConfigManager with a custom file path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    /// An older schema is migrated and written back.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        let migrated = config.schema_version < SCHEMA_VERSION;
        if migrated {
            config = self.migrate(config)?;
        } else if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade s5.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        config.validate()?;
        if migrated {
            self.save(&config)?;
        }
        Ok(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 600 (owner read/write only).
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(())
    }

    /// Migrate configuration from older schema version
    fn migrate(&self, config: Config) -> Result<Config> {
        let mut config = config;
        tracing::info!(
            from = config.schema_version,
            to = SCHEMA_VERSION,
            "migrating configuration"
        );
        config.schema_version = SCHEMA_VERSION;
        Ok(config)
    }
}
