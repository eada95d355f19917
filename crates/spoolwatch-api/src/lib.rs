// spoolwatch-api: Async clients for the Klipper/Moonraker spool endpoints and Spoolman

pub mod endpoint;
pub mod error;
pub mod klipper;
pub mod spoolman;
pub mod transport;

pub use endpoint::Endpoint;
pub use error::Error;
pub use klipper::{KlipperClient, ServerInfo, SpoolSelection};
pub use spoolman::{Filament, HealthStatus, Spool, SpoolmanClient, Vendor};
pub use transport::{TlsMode, TransportConfig};
