//! Configuration schema definitions.

use std::path::PathBuf;

use expander_core::{EngineConfig, ScannerConfig};
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,
}

impl Config {
    /// Directory holding the config file and logs.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".comment-expander")
    }

    /// Default config file location.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }
}

/// Browser connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging HTTP endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Substring a tab URL must contain to be expanded.
    #[serde(default = "default_url_filter")]
    pub url_filter: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            url_filter: default_url_filter(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_url_filter() -> String {
    "reddit.com".to_string()
}
