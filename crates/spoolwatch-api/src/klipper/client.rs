// Klipper/Moonraker HTTP client
//
// Two read-only queries, each available in a fallible `try_*` form that
// reports why it failed and an infallible form for periodic pollers that
// degrades every failure to a sentinel value.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::klipper::models::{MoonrakerResponse, ServerInfo, SpoolIdResult, SpoolSelection};
use crate::transport::{self, TransportConfig};

const SPOOL_ID_PATH: &str = "server/spoolman/spool_id";
const SERVER_INFO_PATH: &str = "server/info";

/// Read-only client for the printer firmware's Moonraker API.
///
/// Holds no mutable state beyond the connection pool inside
/// `reqwest::Client`, so `&self` methods may be called concurrently.
#[derive(Debug, Clone)]
pub struct KlipperClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl KlipperClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is normalized to end with a single `/`; its scheme is
    /// not checked until the first request.
    pub fn new(base_url: impl Into<Endpoint>, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint: base_url.into(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<Endpoint>) -> Self {
        Self {
            http,
            endpoint: base_url.into(),
        }
    }

    /// The normalized base endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    // ── Active spool ─────────────────────────────────────────────────

    /// Fetch the active spool id.
    ///
    /// `GET {endpoint}server/spoolman/spool_id`
    ///
    /// `Ok(None)` means the firmware answered but nothing is selected.
    pub async fn try_active_spool(&self) -> Result<Option<i64>, Error> {
        let result: SpoolIdResult = self.get_result(SPOOL_ID_PATH).await?;
        result.parse()
    }

    /// Fetch the active spool, never failing.
    ///
    /// Transport errors, non-200 answers and malformed payloads all map to
    /// [`SpoolSelection::FetchFailed`].
    pub async fn active_spool(&self) -> SpoolSelection {
        match self.try_active_spool().await {
            Ok(id) => SpoolSelection::from(id),
            Err(e) => {
                log_failure("active spool", &e);
                SpoolSelection::FetchFailed
            }
        }
    }

    // ── Server info ──────────────────────────────────────────────────

    /// Fetch the full `server/info` result.
    ///
    /// `GET {endpoint}server/info`
    pub async fn try_server_info(&self) -> Result<ServerInfo, Error> {
        self.get_result(SERVER_INFO_PATH).await
    }

    /// Fetch the API version string.
    ///
    /// `Ok(None)` when the server answered without `api_version_string`.
    pub async fn try_api_version(&self) -> Result<Option<String>, Error> {
        Ok(self.try_server_info().await?.api_version_string)
    }

    /// Fetch the API version string, never failing.
    pub async fn api_version(&self) -> Option<String> {
        match self.try_api_version().await {
            Ok(version) => version,
            Err(e) => {
                log_failure("api version", &e);
                None
            }
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the `{ "result": ... }` envelope.
    ///
    /// The body is read in full, or the response dropped, before this
    /// returns. A missing `result` decodes as `T::default()`.
    async fn get_result<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint.url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        transport::ensure_ok(&resp)?;
        let body = resp.text().await?;

        let envelope: MoonrakerResponse<T> = transport::decode_json(&body)?;
        Ok(envelope.result.unwrap_or_default())
    }
}

fn log_failure(what: &str, err: &Error) {
    if err.is_transient() {
        debug!(error = %err, "{what} unavailable");
    } else {
        warn!(error = %err, "{what} query failed");
    }
}
