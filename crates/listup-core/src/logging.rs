//! Tracing setup from the `[logging]` config section.
//!
//! Filter precedence: `RUST_LOG`, then `logging.filter`, then
//! `info,listup=debug`. Events go to `logging.file` (default
//! `~/.local/state/listup/listup.log`); `init_logging_stderr` is the fallback.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const DEFAULT_FILTER: &str = "info,listup=debug,listup_core=debug";
const LOG_FILE_NAME: &str = "listup.log";

fn filter_directives(cfg: &LogConfig, env: Option<String>) -> String {
    env.filter(|s| !s.trim().is_empty())
        .or_else(|| cfg.filter.clone())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn env_filter(cfg: &LogConfig) -> Result<EnvFilter> {
    let directives = filter_directives(cfg, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    EnvFilter::try_new(&directives).with_context(|| format!("invalid log filter {directives:?}"))
}

/// Configured log file, or `listup.log` under the XDG state dir.
pub fn log_file_path(cfg: &LogConfig) -> Result<PathBuf> {
    if let Some(path) = &cfg.file {
        return Ok(path.clone());
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("listup")?;
    Ok(xdg_dirs.get_state_home().join("listup").join(LOG_FILE_NAME))
}

/// Install a subscriber that appends to the log file. Returns Err (and
/// installs nothing) if the filter is invalid or the file cannot be opened.
pub fn init_logging(cfg: &LogConfig) -> Result<()> {
    let filter = env_filter(cfg)?;
    let path = log_file_path(cfg)?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("install subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

/// Log to stderr. An invalid configured filter falls back to the default.
pub fn init_logging_stderr(cfg: &LogConfig) {
    let filter = env_filter(cfg).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_configured_filter() {
        let cfg = LogConfig {
            filter: Some("warn".to_string()),
            file: None,
        };
        assert_eq!(filter_directives(&cfg, Some("trace".to_string())), "trace");
        assert_eq!(filter_directives(&cfg, Some("  ".to_string())), "warn");
        assert_eq!(filter_directives(&cfg, None), "warn");
        assert_eq!(filter_directives(&LogConfig::default(), None), DEFAULT_FILTER);
    }

    #[test]
    fn configured_file_is_used_verbatim() {
        let cfg = LogConfig {
            filter: None,
            file: Some(PathBuf::from("/var/log/listup/update.log")),
        };
        assert_eq!(
            log_file_path(&cfg).unwrap(),
            PathBuf::from("/var/log/listup/update.log")
        );
    }

    #[test]
    fn invalid_filter_is_an_error() {
        let cfg = LogConfig {
            filter: Some("listup=notalevel".to_string()),
            file: None,
        };
        assert!(EnvFilter::try_new(filter_directives(&cfg, None)).is_err());
    }
}
