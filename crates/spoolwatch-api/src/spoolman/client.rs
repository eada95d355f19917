// Spoolman HTTP client
//
// Unlike the Klipper queries, these calls return every failure to the
// caller, each as its own `Error` variant.

use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::spoolman::models::{HealthStatus, Spool};
use crate::transport::{self, TransportConfig};

const HEALTH_PATH: &str = "api/v1/health";
const SPOOL_PATH: &str = "api/v1/spool";

/// Client for the Spoolman REST API.
#[derive(Debug, Clone)]
pub struct SpoolmanClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl SpoolmanClient {
    /// Create a new client from a `TransportConfig`.
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

    /// Validate that the endpoint is a reachable, healthy Spoolman.
    ///
    /// `GET {endpoint}api/v1/health`
    ///
    /// Checks, in order: the request succeeds, the status is 200, the body
    /// is declared as JSON, the body parses, and it is an object whose
    /// `status` is `"healthy"`. Each step fails with its own error variant.
    pub async fn check_health(&self) -> Result<HealthStatus, Error> {
        let url = self.endpoint.url(HEALTH_PATH)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        transport::ensure_ok(&resp)?;

        let content_type = transport::content_type(&resp);
        if !content_type.contains("application/json") {
            return Err(Error::UnexpectedContentType { content_type });
        }

        let body = resp.text().await?;
        let value: serde_json::Value = transport::decode_json(&body)?;

        let status = value
            .as_object()
            .and_then(|obj| obj.get("status"))
            .and_then(serde_json::Value::as_str);

        match status {
            Some(s) if s == "healthy" => Ok(HealthStatus { status: s.to_owned() }),
            Some(s) => Err(Error::Unhealthy {
                status: s.to_owned(),
            }),
            None => Err(Error::Unhealthy {
                status: "<missing>".into(),
            }),
        }
    }

    /// List spools.
    ///
    /// `GET {endpoint}api/v1/spool?allow_archived={include_archived}`
    pub async fn list_spools(&self, include_archived: bool) -> Result<Vec<Spool>, Error> {
        let mut url = self.endpoint.url(SPOOL_PATH)?;
        url.query_pairs_mut()
            .append_pair("allow_archived", if include_archived { "true" } else { "false" });
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        transport::ensure_ok(&resp)?;
        let body = resp.text().await?;

        let spools: Vec<Spool> = transport::decode_json(&body)?;
        debug!(count = spools.len(), "fetched spools");
        Ok(spools)
    }

    /// Fetch a single spool by id.
    ///
    /// `GET {endpoint}api/v1/spool/{id}`
    pub async fn get_spool(&self, id: i64) -> Result<Spool, Error> {
        let url = self.endpoint.url(&format!("{SPOOL_PATH}/{id}"))?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        transport::ensure_ok(&resp)?;
        let body = resp.text().await?;

        transport::decode_json(&body)
    }
}
