// Klipper/Moonraker client modules
//
// Read-only queries against Moonraker's `server/` endpoints. Every response
// is wrapped in the `{ "result": { ... } }` envelope.

pub mod client;
pub mod models;

pub use client::KlipperClient;
pub use models::{ServerInfo, SpoolSelection};
