//! TOML-based configuration for grnbind.
//!
//! Supports a config file (grnbind.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [client]
//! timeout_secs = 10
//! match_policy = "strict"   # or "discard"
//!
//! [logger]
//! level = "info"
//! log_path = "${HOME}/.local/state/grnbind/grnbind.log"
//! query_log_path = "./query.log"
//!
//! [schema]
//! syntax = "command"   # or "builder"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::context::{MatchPolicy, DEFAULT_TIMEOUT_SECS};
use crate::schema::Syntax;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Request execution settings.
    pub client: ClientSettings,

    /// Log and query log settings.
    pub logger: LoggerSettings,

    /// Schema dump settings.
    pub schema: SchemaSettings,
}

/// Request execution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Seconds to wait for a matching response.
    pub timeout_secs: u64,

    /// Handling of responses addressed to other requests.
    pub match_policy: MatchPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            match_policy: MatchPolicy::default(),
        }
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Log settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,

    /// Main log file (supports ${ENV_VAR} expansion). Stderr if unset.
    pub log_path: Option<String>,

    /// Query log file (supports ${ENV_VAR} expansion). Disabled if unset.
    pub query_log_path: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_path: None,
            query_log_path: None,
        }
    }
}

impl LoggerSettings {
    /// Main log path with environment variables expanded.
    pub fn resolved_log_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        resolve_path(self.log_path.as_deref())
    }

    /// Query log path with environment variables expanded.
    pub fn resolved_query_log_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        resolve_path(self.query_log_path.as_deref())
    }
}

fn resolve_path(path: Option<&str>) -> Result<Option<PathBuf>, SettingsError> {
    path.map(|p| expand_env_vars(p).map(PathBuf::from))
        .transpose()
}

/// Schema dump settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Default dump syntax.
    pub syntax: Syntax,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `GRNBIND_CONFIG`
    /// 2. `./grnbind.toml`
    /// 3. `~/.config/grnbind/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("GRNBIND_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("grnbind.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("grnbind").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.client.timeout_secs == 0 {
            return Err(SettingsError::InvalidConfig(
                "client.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
