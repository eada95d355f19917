// spoolwatch-core: Polling and threshold logic between spoolwatch-api and consumers (CLI).

pub mod config;
pub mod error;
pub mod poller;
pub mod snapshot;
pub mod threshold;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{TlsVerification, WatchConfig};
pub use error::CoreError;
pub use poller::Poller;
pub use snapshot::{KlipperStatus, Snapshot, SpoolReport};
pub use threshold::{NotificationLevel, Thresholds};

// Re-export API types that surface in snapshots.
pub use spoolwatch_api::{Endpoint, Filament, HealthStatus, Spool, SpoolSelection, Vendor};
