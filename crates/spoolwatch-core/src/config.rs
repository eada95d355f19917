// ── Runtime polling configuration ──
//
// These types describe *what* to poll and how often. They never touch
// disk: the CLI builds a `WatchConfig` from the config file and flags and
// hands it in.

use std::path::PathBuf;
use std::time::Duration;

use crate::threshold::Thresholds;

/// Default polling cadence, matching the setup wizard's default of 15 minutes.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Built-in CA store (strict). Default: Spoolman is usually plain HTTP
    /// and anything on HTTPS should carry a real certificate.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one Spoolman instance and, optionally, the printer
/// that feeds it.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Spoolman base URL (e.g. `http://spoolman.local:7912`).
    pub spoolman_url: String,
    /// Moonraker base URL (e.g. `http://printer.local:7125`). Active-spool
    /// and version queries are skipped when unset.
    pub klipper_url: Option<String>,
    /// Time between polls.
    pub update_interval: Duration,
    /// Remaining-filament notification thresholds.
    pub thresholds: Thresholds,
    /// Include archived spools in the inventory.
    pub show_archived: bool,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl WatchConfig {
    /// A config with defaults for everything but the Spoolman URL.
    pub fn new(spoolman_url: impl Into<String>) -> Self {
        Self {
            spoolman_url: spoolman_url.into(),
            klipper_url: None,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            thresholds: Thresholds::default(),
            show_archived: false,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
