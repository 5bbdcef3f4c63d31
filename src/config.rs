//! TOML configuration support.
//!
//! This module loads the allow-list from TOML, either compiled-in at
//! build time or read from a file at runtime.
//!
//! # Example TOML Format
//!
//! ```toml
//! [access]
//! enabled = true
//! allowed_ips = [
//!     "192.168.178.8",
//!     "192.168.178.0/24",
//!     "192.168.178.0-50",
//!     "192.168.*",
//! ]
//! ```
//!
//! Entries are not validated at load time: classification by shape is
//! the engine's job at match time, and a malformed entry simply never
//! matches. Loading only shapes the file into an [`AccessConfig`].
//!
//! # Usage
//!
//! ```ignore
//! use axum_ip_allow::AllowConfig;
//!
//! // Compile-time embedded config
//! const CONFIG: &str = include_str!("../access.toml");
//! let config = AllowConfig::from_toml(CONFIG)?.into_config();
//!
//! // Or runtime file loading
//! let config = AllowConfig::from_file("config/access.toml")?.into_config();
//! ```

use crate::decider::AccessConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowConfig {
    /// The access restriction settings.
    #[serde(default)]
    pub access: AccessConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing error.
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// File I/O error.
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
}

impl AllowConfig {
    /// Parse configuration from a TOML string.
    ///
    /// # Example
    /// ```
    /// use axum_ip_allow::AllowConfig;
    ///
    /// let toml = r#"
    /// [access]
    /// enabled = true
    /// allowed_ips = ["10.0.0.5", "192.168.1.0/24"]
    /// "#;
    ///
    /// let config = AllowConfig::from_toml(toml).unwrap();
    /// assert!(config.access.enabled);
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: AllowConfig = toml::from_str(toml_str)?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Extract the engine-facing [`AccessConfig`].
    pub fn into_config(self) -> AccessConfig {
        self.access
    }
}
