// Spoolman client modules
//
// Health check used to validate a configured URL, and the spool inventory
// listing under `api/v1/`.

pub mod client;
pub mod models;

pub use client::SpoolmanClient;
pub use models::{Filament, HealthStatus, Spool, Vendor};
