use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LcuError, Result};

// Application configuration stored in config.json

pub const CONFIG_ENV_VAR: &str = "SKIN_PICKER_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// League install directory, used for the lockfile fallback
    #[serde(default)]
    pub league_path: Option<String>,
    #[serde(default = "default_ddragon_base_url")]
    pub ddragon_base_url: String,
    #[serde(default = "default_cdragon_base_url")]
    pub cdragon_base_url: String,
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_ddragon_base_url() -> String {
    "https://ddragon.leagueoflegends.com".to_string()
}

fn default_cdragon_base_url() -> String {
    "https://raw.communitydragon.org/latest/plugins/rcp-be-lol-game-data/global/default/v1"
        .to_string()
}

fn default_retry_interval_ms() -> u64 {
    3000
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_listen_addr() -> String {
    "0.0.0.0:8642".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            league_path: None,
            ddragon_base_url: default_ddragon_base_url(),
            cdragon_base_url: default_cdragon_base_url(),
            retry_interval_ms: default_retry_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            listen_addr: default_listen_addr(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| LcuError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("logs"))
    }
}

/// Per-user data directory, falling back to the working directory.
pub fn data_dir() -> PathBuf {
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("skin-picker");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".skin-picker");
    }
    PathBuf::from(".")
}

pub fn default_config_path() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join("config").join("config.json"))
}
