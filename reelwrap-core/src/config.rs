//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/reelwrap/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/reelwrap/` (~/.config/reelwrap/)
//! - State/Logs: `$XDG_STATE_HOME/reelwrap/` (~/.local/state/reelwrap/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Input table parsing
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Ranking sizes for the stats bundle
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the viewing log is read
#[derive(Debug, Deserialize, Clone)]
pub struct LoaderConfig {
    /// Field delimiter (single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Number of leading records echoed in the summary
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// chrono format strings tried in order; replaces the built-in list when set
    #[serde(default)]
    pub timestamp_formats: Option<Vec<String>>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            sample_size: default_sample_size(),
            timestamp_formats: None,
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_sample_size() -> usize {
    10
}

/// Top-K sizes used by the stats engine
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    #[serde(default = "default_top_genres")]
    pub top_genres: usize,

    #[serde(default = "default_top_shows")]
    pub top_shows: usize,

    #[serde(default = "default_top_days")]
    pub top_days: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_genres: default_top_genres(),
            top_shows: default_top_shows(),
            top_days: default_top_days(),
        }
    }
}

fn default_top_genres() -> usize {
    5
}

fn default_top_shows() -> usize {
    5
}

fn default_top_days() -> usize {
    3
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.loader.delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "loader.delimiter must be a single ASCII character, got {:?}",
                self.loader.delimiter
            )));
        }
        if let Some(formats) = &self.loader.timestamp_formats {
            if formats.is_empty() {
                return Err(Error::Config(
                    "loader.timestamp_formats must not be empty when set".to_string(),
                ));
            }
        }
        let analytics = &self.analytics;
        if analytics.top_genres == 0 || analytics.top_shows == 0 || analytics.top_days == 0 {
            return Err(Error::Config(
                "analytics.top_genres, top_shows and top_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/reelwrap/config.toml` (~/.config/reelwrap/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("reelwrap").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/reelwrap/` (~/.local/state/reelwrap/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("reelwrap")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.loader.delimiter, ',');
        assert_eq!(config.loader.sample_size, 10);
        assert!(config.loader.timestamp_formats.is_none());
        assert_eq!(config.analytics.top_genres, 5);
        assert_eq!(config.analytics.top_shows, 5);
        assert_eq!(config.analytics.top_days, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[loader]
delimiter = ";"
sample_size = 3
timestamp_formats = ["%d/%m/%Y %H:%M"]

[analytics]
top_shows = 8

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.loader.delimiter, ';');
        assert_eq!(config.loader.sample_size, 3);
        assert_eq!(
            config.loader.timestamp_formats.as_deref(),
            Some(&["%d/%m/%Y %H:%M".to_string()][..])
        );
        assert_eq!(config.analytics.top_shows, 8);
        assert_eq!(config.analytics.top_genres, 5);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = Config {
            analytics: AnalyticsConfig {
                top_days: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            loader: LoaderConfig {
                delimiter: '→',
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            loader: LoaderConfig {
                timestamp_formats: Some(vec![]),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analytics]\ntop_genres = 7\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.analytics.top_genres, 7);

        std::fs::write(&path, "[analytics]\ntop_genres = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
