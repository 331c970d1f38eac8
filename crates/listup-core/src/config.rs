use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::store::FsByteStore;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per update cycle (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

/// Logging settings (optional `[logging]` section in config.toml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `"info,listup_core=trace"`. `RUST_LOG` wins.
    #[serde(default)]
    pub filter: Option<String>,
    /// Log file path (default: `~/.local/state/listup/listup.log`).
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Global configuration loaded from `~/.config/listup/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListupConfig {
    /// Reject lists that carry neither a checksum nor a license line.
    pub require_license: bool,
    /// Fail an update on the first malformed rule instead of skipping it.
    pub report_compile_errors: bool,
    /// Directory for staged downloads and compiled artifacts (default: XDG state dir).
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for ListupConfig {
    fn default() -> Self {
        Self {
            require_license: true,
            report_compile_errors: false,
            store_dir: None,
            retry: None,
            logging: LogConfig::default(),
        }
    }
}

impl ListupConfig {
    /// Configured store directory, or `~/.local/state/listup/store`.
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => FsByteStore::default_root(),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("listup")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ListupConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ListupConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ListupConfig = toml::from_str(&data)?;
    Ok(cfg)
}
