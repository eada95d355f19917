//! CLI configuration: thin wrapper around `spoolwatch_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--config, --spoolman-url, --klipper-url, --timeout, --insecure).

use std::path::PathBuf;

use spoolwatch_core::WatchConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use spoolwatch_config::{Config, config_path, load_config_from, save_config_to};

/// The config file in effect: `--config` if given, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the config file with flag overrides applied.
pub fn load_effective(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config_from(&config_file(global))?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

/// Resolve flags + config file into a validated `WatchConfig`.
///
/// `interval` (minutes) replaces the configured polling interval before
/// validation.
pub fn resolve(global: &GlobalOpts, interval: Option<u64>) -> Result<WatchConfig, CliError> {
    let mut cfg = load_effective(global)?;
    if let Some(mins) = interval {
        cfg.update_interval = mins;
    }
    if cfg.spoolman_url.is_none() {
        return Err(CliError::NoUrl {
            path: config_file(global).display().to_string(),
        });
    }
    Ok(cfg.to_watch_config()?)
}

/// Flag > env > file.
fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.spoolman_url {
        cfg.spoolman_url = Some(url.clone());
    }
    if let Some(ref url) = global.klipper_url {
        cfg.klipper_url = Some(url.clone());
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }
}
