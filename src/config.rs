//! TOML configuration for listings and logging.
//!
//! The file is looked up at `$MAILSHELL_CONFIG` first, then under the
//! platform config directory as `mailshell/config.toml`. A missing or
//! unusable file means built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Listing layout settings.
    pub display: DisplayConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Listing layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// `strftime` format string for dates in listings.
    pub date_format: String,
    /// From column width.
    pub from_width: usize,
    /// To column width.
    pub to_width: usize,
    /// Subject column width.
    pub subject_width: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d %H:%M".to_string(),
            from_width: 25,
            to_width: 25,
            subject_width: 40,
        }
    }
}

/// Load the configuration, falling back to built-in defaults when there
/// is no file or the file cannot be used.
pub fn load_config() -> Config {
    let Some(path) = config_file_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match parse_config_file(&path) {
        Ok(cfg) => {
            tracing::info!(path = %path.display(), "Read configuration file");
            cfg
        }
        Err(reason) => {
            tracing::warn!(path = %path.display(), %reason, "Ignoring unusable config file");
            Config::default()
        }
    }
}

/// Read and parse one candidate config file.
fn parse_config_file(path: &Path) -> std::result::Result<Config, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("unreadable: {e}"))?;
    toml::from_str(&text).map_err(|e| format!("invalid TOML: {e}"))
}

/// Where the configuration lives: the `MAILSHELL_CONFIG` override wins,
/// otherwise the platform config directory.
pub fn config_file_path() -> Option<PathBuf> {
    match std::env::var_os("MAILSHELL_CONFIG") {
        Some(overridden) => Some(PathBuf::from(overridden)),
        None => {
            let dir = dirs::config_dir()?;
            Some(dir.join("mailshell").join("config.toml"))
        }
    }
}
