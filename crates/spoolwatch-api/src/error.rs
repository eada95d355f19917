use thiserror::Error;

/// Top-level error type for the `spoolwatch-api` crate.
///
/// Covers every failure mode a request can hit, from the socket up to
/// the JSON payload. The status queries on [`KlipperClient`](crate::KlipperClient)
/// absorb these into sentinel values; the Spoolman health check surfaces
/// them so callers can tell the user exactly what went wrong.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Response ────────────────────────────────────────────────────
    /// The server answered with something other than `200 OK`.
    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    /// The server answered with a body that is not declared as JSON.
    #[error("Unexpected content type: {content_type:?}")]
    UnexpectedContentType { content_type: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A field the caller relies on was absent or had the wrong shape.
    #[error("Missing or invalid field in response: {field}")]
    MissingField { field: &'static str },

    // ── Service state ───────────────────────────────────────────────
    /// The health endpoint answered, but did not report `healthy`.
    #[error("Service reports status {status:?} instead of \"healthy\"")]
    Unhealthy { status: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::UnexpectedStatus { status } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request never produced a response.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Returns `true` if the request hit the transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
