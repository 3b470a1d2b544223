#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for canopy
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/canopy/config.toml)
//! - Environment variables
//! - CLI flags (applied by the application)

mod slots;

pub use slots::SlotAssignmentConfig;

use canopy_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub register: RegisterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Slot assignments made at startup, in registration order
    #[serde(default)]
    pub slots: Vec<SlotAssignmentConfig>,
}

/// Site-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Overrides the root node's title as the site title
    pub title: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
}

/// Local navigation behaviour
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NavigationConfig {
    /// Let the site root act as a local navigation parent
    #[serde(default)]
    pub include_root: bool,
}

/// Self-registration settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegisterConfig {
    /// Group newly registered users are added to
    pub group: Option<String>,
    /// Role granted to newly registered users, without the `role:` prefix
    pub role: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

// Default implementations

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: None,
            locale: default_locale(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions for serde
fn default_locale() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("canopy").join("config.toml"))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Serialize configuration to TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, Error> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError {
                error: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            slot_assignments = config.slots.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // CANOPY_SITE_TITLE
        if let Ok(title) = std::env::var("CANOPY_SITE_TITLE") {
            self.site.title = Some(title);
        }

        // CANOPY_REGISTER_GROUP
        if let Ok(group) = std::env::var("CANOPY_REGISTER_GROUP") {
            self.register.group = non_empty(group);
        }

        // CANOPY_REGISTER_ROLE
        if let Ok(role) = std::env::var("CANOPY_REGISTER_ROLE") {
            self.register.role = non_empty(role);
        }

        // CANOPY_LOG_LEVEL
        if let Ok(level) = std::env::var("CANOPY_LOG_LEVEL") {
            self.logging.level = level;
        }

        // CANOPY_LOG_JSON
        if let Ok(json) = std::env::var("CANOPY_LOG_JSON") {
            self.logging.json = parse_bool("CANOPY_LOG_JSON", json)?;
        }

        // CANOPY_NAV_INCLUDE_ROOT
        if let Ok(include_root) = std::env::var("CANOPY_NAV_INCLUDE_ROOT") {
            self.navigation.include_root = parse_bool("CANOPY_NAV_INCLUDE_ROOT", include_root)?;
        }

        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_bool(field: &str, value: String) -> Result<bool, Error> {
    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()),
    }
}
