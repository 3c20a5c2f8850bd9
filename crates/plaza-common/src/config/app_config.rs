//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub relay: ServerConfig,
    pub session: SessionConfig,
    pub static_files: StaticFilesConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
    /// Log output format; `None` picks one from `env`
    #[serde(default)]
    pub log_format: Option<LogFormat>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
            log_format: None,
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Listener configuration for the relay server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Per-connection session tuning
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Capacity of each connection's outbound queue
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
    /// Heartbeat interval advertised to clients in Hello (ms)
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_ms: u64,
    /// Inactivity window after which a connection is dropped (ms)
    #[serde(default = "default_heartbeat_timeout")]
    pub heartbeat_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: default_outbound_buffer(),
            heartbeat_interval_ms: default_heartbeat_interval(),
            heartbeat_timeout_ms: default_heartbeat_timeout(),
        }
    }
}

/// Static asset serving
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticFilesConfig {
    /// Directory served for any path the router does not handle
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// Default value functions
fn default_app_name() -> String {
    "plaza".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_heartbeat_interval() -> u64 {
    15_000
}

fn default_heartbeat_timeout() -> u64 {
    45_000
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Every variable is optional; unset variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(s) => Environment::parse(&s).ok_or(ConfigError::InvalidValue("APP_ENV", s))?,
            None => Environment::default(),
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(s) => Some(LogFormat::parse(&s).ok_or(ConfigError::InvalidValue("LOG_FORMAT", s))?),
            None => None,
        };

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
                log_format,
            },
            relay: ServerConfig {
                host: lookup("RELAY_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "RELAY_PORT")?.unwrap_or_else(default_port),
            },
            session: SessionConfig {
                outbound_buffer: parse_var(&lookup, "RELAY_OUTBOUND_BUFFER")?
                    .unwrap_or_else(default_outbound_buffer),
                heartbeat_interval_ms: parse_var(&lookup, "RELAY_HEARTBEAT_INTERVAL_MS")?
                    .unwrap_or_else(default_heartbeat_interval),
                heartbeat_timeout_ms: parse_var(&lookup, "RELAY_HEARTBEAT_TIMEOUT_MS")?
                    .unwrap_or_else(default_heartbeat_timeout),
            },
            static_files: StaticFilesConfig {
                dir: lookup("STATIC_DIR")
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    fn validate(&self) -> Result<(), ConfigError> {
        if self.session.outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "RELAY_OUTBOUND_BUFFER",
                "must be greater than zero".to_string(),
            ));
        }
        if self.session.heartbeat_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "RELAY_HEARTBEAT_INTERVAL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.session.heartbeat_timeout_ms <= self.session.heartbeat_interval_ms {
            return Err(ConfigError::InvalidValue(
                "RELAY_HEARTBEAT_TIMEOUT_MS",
                "must exceed RELAY_HEARTBEAT_INTERVAL_MS".to_string(),
            ));
        }
        Ok(())
    }

    /// Log format to use, falling back to JSON in production
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.app.log_format.unwrap_or(if self.app.env.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
