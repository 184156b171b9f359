//! Configuration loading and management

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Auth secrets
///
/// Both fields are required; their absence is fatal at startup, never
/// at request time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Server-side pepper mixed into password hashing
    #[serde(default)]
    pub pepper: String,
    /// Hex-encoded 32-byte symmetric key for the token codec
    #[serde(default)]
    pub token_key: String,
}

/// Outbound email configuration; delivery is disabled when no API key
/// is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_email_endpoint")]
    pub endpoint: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from_address: default_from_address(),
            endpoint: default_email_endpoint(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_path() -> String {
    "data/berth.db".to_string()
}

fn default_from_address() -> String {
    "no-reply@berth.local".to_string()
}

fn default_email_endpoint() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Validate required fields, resolved once before first use.
    pub fn validate(&self) -> Result<()> {
        if self.auth.pepper.is_empty() {
            bail!("auth.pepper is required (set it in the config file or BERTH_PEPPER)");
        }
        if self.auth.token_key.is_empty() {
            bail!("auth.token_key is required (set it in the config file or BERTH_TOKEN_KEY)");
        }
        Ok(())
    }
}
