// ── Core error types ──
//
// User-facing errors from spoolwatch-core. `CoreError::from_api` translates
// transport-layer errors into domain variants and attaches the URL that was
// being queried, since the API errors do not always carry one.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Response errors ──────────────────────────────────────────────
    #[error("{url} answered with HTTP status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("{url} did not return JSON (content type {content_type:?})")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("{url} returned an invalid response: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Spoolman at {url} reports status {status:?}")]
    Unhealthy { url: String, status: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Translate an API error raised while talking to `url`.
    pub fn from_api(url: &str, err: spoolwatch_api::Error) -> Self {
        use spoolwatch_api::Error as ApiError;

        let url = url.to_owned();
        match err {
            ApiError::Transport(ref e) if e.is_timeout() => CoreError::Timeout { url },
            ApiError::Transport(e) => CoreError::ConnectionFailed {
                url,
                reason: e.to_string(),
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL {url:?}: {e}"),
            },
            ApiError::Tls(reason) => CoreError::ConnectionFailed {
                url,
                reason: format!("TLS error: {reason}"),
            },
            ApiError::UnexpectedStatus { status } => CoreError::UnexpectedStatus { url, status },
            ApiError::UnexpectedContentType { content_type } => {
                CoreError::UnexpectedContentType { url, content_type }
            }
            ApiError::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { url, message }
            }
            ApiError::MissingField { field } => CoreError::InvalidResponse {
                url,
                message: format!("missing or invalid field `{field}`"),
            },
            ApiError::Unhealthy { status } => CoreError::Unhealthy { url, status },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keeps_url() {
        let err = CoreError::from_api(
            "http://spoolman/",
            spoolwatch_api::Error::UnexpectedStatus { status: 404 },
        );
        assert!(matches!(
            err,
            CoreError::UnexpectedStatus { ref url, status: 404 } if url == "http://spoolman/"
        ));
    }

    #[test]
    fn unhealthy_message_names_status() {
        let err = CoreError::from_api(
            "http://spoolman/",
            spoolwatch_api::Error::Unhealthy {
                status: "degraded".into(),
            },
        );
        assert!(err.to_string().contains("degraded"));
    }
}
