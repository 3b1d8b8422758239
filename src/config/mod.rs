//! Configuration module for grnbind.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, ClientSettings, LoggerSettings, SchemaSettings, Settings, SettingsError,
};
