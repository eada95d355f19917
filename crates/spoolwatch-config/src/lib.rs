//! Shared configuration for spoolwatch.
//!
//! TOML config file + `SPOOLWATCH_*` environment overrides, validation of
//! the setup fields (URLs, polling interval, notification thresholds), and
//! translation to `spoolwatch_core::WatchConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use spoolwatch_core::{Thresholds, TlsVerification, WatchConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no Spoolman URL configured")]
    MissingUrl,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
///
/// Field names follow the integration's setup form so an exported entry
/// can be pasted in as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Spoolman base URL (e.g. "http://spoolman.local:7912").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoolman_url: Option<String>,

    /// Moonraker base URL (e.g. "http://printer.local:7125").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub klipper_url: Option<String>,

    /// Minutes between polls.
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,

    /// Percent remaining at or below which a spool is reported as info.
    #[serde(default = "default_threshold_info")]
    pub notification_threshold_info: u8,

    /// Percent remaining at or below which a spool is reported as warning.
    #[serde(default = "default_threshold_warning")]
    pub notification_threshold_warning: u8,

    /// Percent remaining at or below which a spool is reported as critical.
    #[serde(default = "default_threshold_critical")]
    pub notification_threshold_critical: u8,

    /// Include archived spools.
    #[serde(default)]
    pub show_archived: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            spoolman_url: None,
            klipper_url: None,
            update_interval: default_update_interval(),
            notification_threshold_info: thresholds.info,
            notification_threshold_warning: thresholds.warning,
            notification_threshold_critical: thresholds.critical,
            show_archived: false,
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

/// Longest accepted polling interval, in minutes (one week).
pub const MAX_UPDATE_INTERVAL: u64 = 7 * 24 * 60;

fn default_update_interval() -> u64 {
    15
}
fn default_threshold_info() -> u8 {
    Thresholds::default().info
}
fn default_threshold_warning() -> u8 {
    Thresholds::default().warning
}
fn default_threshold_critical() -> u8 {
    Thresholds::default().critical
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Notification thresholds as a core type.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            info: self.notification_threshold_info,
            warning: self.notification_threshold_warning,
            critical: self.notification_threshold_critical,
        }
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spoolman = self.spoolman_url.as_deref().ok_or(ConfigError::MissingUrl)?;
        validate_url("spoolman_url", spoolman)?;

        if let Some(ref klipper) = self.klipper_url {
            validate_url("klipper_url", klipper)?;
        }

        if !(1..=MAX_UPDATE_INTERVAL).contains(&self.update_interval) {
            return Err(ConfigError::Validation {
                field: "update_interval".into(),
                reason: format!(
                    "must be between 1 and {MAX_UPDATE_INTERVAL} minutes, got {}",
                    self.update_interval
                ),
            });
        }

        for (field, value) in [
            ("notification_threshold_info", self.notification_threshold_info),
            ("notification_threshold_warning", self.notification_threshold_warning),
            ("notification_threshold_critical", self.notification_threshold_critical),
        ] {
            if value > 100 {
                return Err(ConfigError::Validation {
                    field: field.into(),
                    reason: format!("must be between 0 and 100, got {value}"),
                });
            }
        }

        if self.timeout < 1 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let t = self.thresholds();
        if !(t.critical <= t.warning && t.warning <= t.info) {
            warn!(
                info = t.info,
                warning = t.warning,
                critical = t.critical,
                "notification thresholds are not ordered critical <= warning <= info"
            );
        }

        Ok(())
    }

    /// Validate and build a `WatchConfig`.
    pub fn to_watch_config(&self) -> Result<WatchConfig, ConfigError> {
        self.validate()?;

        let spoolman_url = self.spoolman_url.clone().ok_or(ConfigError::MissingUrl)?;

        let tls = if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(WatchConfig {
            spoolman_url,
            klipper_url: self.klipper_url.clone(),
            update_interval: Duration::from_secs(self.update_interval * 60),
            thresholds: self.thresholds(),
            show_archived: self.show_archived,
            tls,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

/// Require an absolute `http`/`https` URL with a host.
fn validate_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: field.into(),
        reason,
    };

    let url = url::Url::parse(raw).map_err(|e| invalid(format!("{raw:?} is not a URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "expected an http or https URL, got scheme {:?}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid(format!("{raw:?} has no host")));
    }
    Ok(())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "spoolwatch", "spoolwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("spoolwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + `SPOOLWATCH_*` environment variables.
///
/// A missing file is not an error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SPOOLWATCH_").only(ENV_KEYS));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Environment keys honoured as overrides (after the `SPOOLWATCH_` prefix).
const ENV_KEYS: &[&str] = &[
    "spoolman_url",
    "klipper_url",
    "update_interval",
    "notification_threshold_info",
    "notification_threshold_warning",
    "notification_threshold_critical",
    "show_archived",
    "timeout",
    "insecure",
    "ca_cert",
];

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn valid() -> Config {
        Config {
            spoolman_url: Some("http://spoolman.local:7912".into()),
            klipper_url: Some("http://printer.local:7125/".into()),
            ..Config::default()
        }
    }

    #[test]
    fn defaults_match_setup_form() {
        let cfg = Config::default();
        assert_eq!(cfg.update_interval, 15);
        assert!(!cfg.show_archived);
        assert_eq!(cfg.thresholds(), Thresholds::default());
    }

    #[test]
    fn valid_config_translates() {
        let watch = valid().to_watch_config().unwrap();
        assert_eq!(watch.update_interval, Duration::from_secs(15 * 60));
        assert_eq!(watch.klipper_url.as_deref(), Some("http://printer.local:7125/"));
        assert_eq!(watch.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn missing_url_rejected() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::MissingUrl)
        ));
    }

    #[test]
    fn non_http_url_rejected() {
        let cfg = Config {
            spoolman_url: Some("ftp://spoolman".into()),
            ..valid()
        };
        match cfg.validate() {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, "spoolman_url"),
            other => panic!("expected Validation, got {other:?}"),
        }

        let cfg = Config {
            klipper_url: Some("printer.local".into()),
            ..valid()
        };
        match cfg.validate() {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, "klipper_url"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn threshold_above_100_rejected() {
        let cfg = Config {
            notification_threshold_warning: 101,
            ..valid()
        };
        match cfg.validate() {
            Err(ConfigError::Validation { field, .. }) => {
                assert_eq!(field, "notification_threshold_warning");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn boundary_thresholds_accepted() {
        let cfg = Config {
            notification_threshold_info: 100,
            notification_threshold_warning: 0,
            notification_threshold_critical: 0,
            ..valid()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn zero_interval_rejected() {
        let cfg = Config {
            update_interval: 0,
            ..valid()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "update_interval"
        ));
    }

    #[test]
    fn oversized_interval_rejected() {
        let cfg = Config {
            update_interval: 1u64 << 62,
            ..valid()
        };
        assert!(matches!(
            cfg.to_watch_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "update_interval"
        ));

        let cfg = Config {
            update_interval: MAX_UPDATE_INTERVAL,
            ..valid()
        };
        assert_eq!(
            cfg.to_watch_config().unwrap().update_interval,
            Duration::from_secs(MAX_UPDATE_INTERVAL * 60)
        );
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let cfg = Config {
            insecure: true,
            ca_cert: Some(PathBuf::from("/etc/ca.pem")),
            ..valid()
        };
        assert_eq!(
            cfg.to_watch_config().unwrap().tls,
            TlsVerification::DangerAcceptInvalid
        );
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            show_archived: true,
            notification_threshold_info: 35,
            ..valid()
        };
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("spoolman_url"));
        assert!(!text.contains("ca_cert"));

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.spoolman_url, cfg.spoolman_url);
        assert_eq!(loaded.notification_threshold_info, 35);
        assert!(loaded.show_archived);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "spoolman_url = \"http://s:7912\"\nupdate_interval = 5\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.update_interval, 5);
        assert_eq!(loaded.timeout, 30);
        assert_eq!(loaded.notification_threshold_critical, 5);
    }

    #[test]
    fn out_of_range_threshold_in_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "notification_threshold_info = 300\n").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }
}
