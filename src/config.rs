//! Configuration file handling.
//!
//! This module provides loading and saving of compromise-scan configuration
//! from a TOML file. Every value can be overridden on the command line.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/compromise-scan/config.toml`
//! - macOS: `~/Library/Application Support/compromise-scan/config.toml`
//! - Windows: `%APPDATA%\compromise-scan\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! csv_path = "compromise/sha1_hulud_full.csv"
//! output_path = "compromise-scan-report.json"
//! default_format = "table"
//! parallel = true
//! max_workers = 8
//! fail_on_load_error = false
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::output::DEFAULT_OUTPUT;

/// Default location of the compromised package list.
pub const DEFAULT_CSV: &str = "compromise/sha1_hulud_full.csv";

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use compromise_scan::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("List: {}", config.csv_path.display());
/// println!("Workers: {}", config.workers());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compromised package list used when `--csv` is not given.
    pub csv_path: PathBuf,

    /// Report location used when `--output` is not given.
    pub output_path: PathBuf,

    /// Console format: "table" or "json".
    pub default_format: String,

    /// Scan manifests on a worker pool.
    ///
    /// Default: true
    pub parallel: bool,

    /// Upper bound on concurrent manifest reads. `0` means one per CPU.
    pub max_workers: usize,

    /// Exit non-zero when the compromised list cannot be read.
    ///
    /// Default: false (an unreadable list yields an empty SAFE report and exit 0)
    pub fail_on_load_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            default_format: "table".to_string(),
            parallel: true,
            max_workers: 0,
            fail_on_load_error: false,
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// ```
    /// use compromise_scan::Config;
    ///
    /// let path = Config::config_path();
    /// assert!(path.ends_with("compromise-scan/config.toml"));
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("compromise-scan")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Number of concurrent manifest workers to use.
    pub fn workers(&self) -> usize {
        if self.max_workers > 0 {
            return self.max_workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}
