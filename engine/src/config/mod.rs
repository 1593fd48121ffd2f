//! Configuration management
//!
//! This module handles loading, validation, and management of the Compass configuration.
//! Configuration is stored in TOML format at ~/.compass/config.toml.
//!
//! # Configuration Sections
//!
//! - **server**: Bind address, port, log level
//! - **database**: SQLite connection string and pool size
//! - **session**: Cookie signing secret, lifetime and cookie attributes
//! - **security**: Password hashing cost
//! - **advisor**: External chat-completion credential and request settings
//!
//! Every field has a default, so an empty file is a valid configuration.
//!
//! # Environment Overrides
//!
//! After the file is parsed, these variables take precedence:
//!
//! - `COMPASS_PORT` → `server.port`
//! - `COMPASS_DATABASE_URL` → `database.url`
//! - `COMPASS_SESSION_SECRET` → `session.secret`
//! - `OPENAI_API_KEY` → `advisor.api_key`
//!
//! # Examples
//!
//! ```no_run
//! use compass_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//!
//! println!("Listening on {}", config.server.bind_address());
//! println!("Live advisor enabled: {}", config.advisor.api_key().is_some());
//! # Ok(())
//! # }
//! ```

use crate::auth::SecretString;
use sdk::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
///
/// Constructed once at startup and handed to the components that need it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Data store settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session cookie settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Password hashing settings
    #[serde(default)]
    pub security: SecurityConfig,

    /// Advisor (external chat-completion API) settings
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Data store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string (supports ~ expansion in the path)
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign session cookies. Empty means a random
    /// per-process secret, so sessions do not survive a restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,

    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Add the `Secure` attribute to the cookie
    #[serde(default)]
    pub secure_cookie: bool,
}

impl SessionConfig {
    /// Configured signing secret, if one is set and not blank
    pub fn secret(&self) -> Option<SecretString> {
        non_blank_secret(self.secret.as_deref())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Password hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// PBKDF2 iteration count for new password hashes
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

/// Advisor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Chat-completion API key. Its presence enables the live advisor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_advisor_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_advisor_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_advisor_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds; expiry falls back to the local template
    #[serde(default = "default_advisor_timeout")]
    pub timeout_secs: u64,
}

impl AdvisorConfig {
    /// Configured API key, if one is set and not blank
    pub fn api_key(&self) -> Option<SecretString> {
        non_blank_secret(self.api_key.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_url() -> String {
    "sqlite://~/.compass/compass.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_session_ttl() -> u64 {
    86400
}

fn default_cookie_name() -> String {
    "compass_session".to_string()
}

fn default_password_iterations() -> u32 {
    100_000
}

fn default_advisor_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_advisor_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_advisor_temperature() -> f32 {
    0.7
}

fn default_advisor_timeout() -> u64 {
    20
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: default_session_ttl(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            password_iterations: default_password_iterations(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_advisor_base_url(),
            model: default_advisor_model(),
            temperature: default_advisor_temperature(),
            timeout_secs: default_advisor_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.compass/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    /// Environment overrides are applied before validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, AppError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)?;
            Self::load_from_path(&config_path)
        }
    }

    /// Load configuration from a specific path, applying environment overrides
    pub fn load_from_path(path: &Path) -> Result<Self, AppError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        config.apply_env_overrides();
        config.validate_and_process()?;

        Ok(config)
    }

    /// Parse and validate configuration text without consulting the environment
    pub fn from_toml_str(contents: &str) -> Result<Self, AppError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;
        Ok(config)
    }

    /// Write the default configuration to `path`
    ///
    /// Creates the parent directory if needed. Returns `false` without
    /// touching anything when the file already exists.
    pub fn create_default(path: &Path) -> Result<bool, AppError> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(true)
    }

    /// Get the default configuration file path (~/.compass/config.toml)
    pub fn default_config_path() -> Result<PathBuf, AppError> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".compass").join("config.toml"))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Unparseable values are ignored with a warning so a stray variable
    /// cannot prevent startup.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("COMPASS_PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid COMPASS_PORT value"),
            }
        }
        if let Some(url) = lookup("COMPASS_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = lookup("COMPASS_SESSION_SECRET") {
            self.session.secret = Some(secret);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.advisor.api_key = Some(key);
        }
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates ranges and enumerations
    /// - Expands ~ in the database path
    /// - Creates the database directory if it doesn't exist
    fn validate_and_process(&mut self) -> Result<(), AppError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.server.log_level.as_str()) {
            return Err(AppError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.server.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if self.server.port == 0 {
            return Err(AppError::Config("server.port must not be 0".to_string()));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        if self.session.ttl_secs == 0 {
            return Err(AppError::Config(
                "session.ttl_secs must be greater than 0".to_string(),
            ));
        }

        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AppError::Config(
                "session.cookie_name must be non-empty and contain only [A-Za-z0-9_-]"
                    .to_string(),
            ));
        }

        if self.security.password_iterations < 1000 {
            return Err(AppError::Config(
                "security.password_iterations must be at least 1000".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.advisor.temperature) {
            return Err(AppError::Config(
                "advisor.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.advisor.timeout_secs == 0 {
            return Err(AppError::Config(
                "advisor.timeout_secs must be greater than 0".to_string(),
            ));
        }

        self.advisor.base_url = self.advisor.base_url.trim_end_matches('/').to_string();

        self.database.url = expand_database_url(&self.database.url)?;

        if let Some(db_path) = database_path(&self.database.url) {
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.exists() {
                    fs::create_dir_all(parent).map_err(|e| {
                        AppError::Config(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }

        Ok(())
    }
}

fn non_blank_secret(value: Option<&str>) -> Option<SecretString> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

/// Strip the scheme from a SQLite URL, returning `None` for in-memory databases
fn database_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let rest = rest.split('?').next().unwrap_or(rest);

    if rest.is_empty() || rest.starts_with(":memory:") {
        None
    } else {
        Some(PathBuf::from(rest))
    }
}

/// Validate the scheme and expand ~ in a SQLite URL
fn expand_database_url(url: &str) -> Result<String, AppError> {
    if !url.starts_with("sqlite:") {
        return Err(AppError::Config(format!(
            "Unsupported database url '{}'. Only sqlite: urls are supported",
            url
        )));
    }

    match database_path(url) {
        Some(path) => {
            let query = url.split_once('?').map(|(_, q)| q);
            let expanded = expand_path(&path)?;
            Ok(match query {
                Some(q) => format!("sqlite:{}?{}", expanded.display(), q),
                None => format!("sqlite:{}", expanded.display()),
            })
        }
        None => Ok(url.to_string()),
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, AppError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| AppError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
