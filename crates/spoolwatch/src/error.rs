//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use spoolwatch_config::ConfigError;
use spoolwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const UNHEALTHY: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(spoolwatch::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(spoolwatch::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { url: String },

    // ── Response ─────────────────────────────────────────────────────
    #[error("{url} answered with HTTP status {status}")]
    #[diagnostic(
        code(spoolwatch::unexpected_status),
        help("Check that the URL points at the service root, not a sub-path.")
    )]
    UnexpectedStatus { url: String, status: u16 },

    #[error("{url} did not return JSON (content type {content_type:?})")]
    #[diagnostic(
        code(spoolwatch::not_json),
        help(
            "Something other than the expected API answered.\n\
             A reverse proxy login page or the web UI port are common causes."
        )
    )]
    NotJson { url: String, content_type: String },

    #[error("{url} returned an invalid response")]
    #[diagnostic(code(spoolwatch::invalid_response), help("{message}"))]
    InvalidResponse { url: String, message: String },

    #[error("Spoolman at {url} is not healthy (status {status:?})")]
    #[diagnostic(
        code(spoolwatch::unhealthy),
        help("Spoolman is reachable but reports a problem. Check its logs.")
    )]
    Unhealthy { url: String, status: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No Spoolman URL configured")]
    #[diagnostic(
        code(spoolwatch::no_url),
        help(
            "Pass --spoolman-url, set SPOOLWATCH_SPOOLMAN_URL, or run: spoolwatch config init\n\
             Config file expected at: {path}"
        )
    )]
    NoUrl { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(spoolwatch::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(spoolwatch::config))]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(spoolwatch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(spoolwatch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Unhealthy { .. } => exit_code::UNHEALTHY,
            Self::NoUrl { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { url } => Self::Timeout { url },
            CoreError::UnexpectedStatus { url, status } => Self::UnexpectedStatus { url, status },
            CoreError::UnexpectedContentType { url, content_type } => {
                Self::NotJson { url, content_type }
            }
            CoreError::InvalidResponse { url, message } => Self::InvalidResponse { url, message },
            CoreError::Unhealthy { url, status } => Self::Unhealthy { url, status },
            CoreError::Config { message } => Self::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::MissingUrl => Self::NoUrl {
                path: spoolwatch_config::config_path().display().to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_kind() {
        let unhealthy = CliError::from(CoreError::Unhealthy {
            url: "http://s/".into(),
            status: "degraded".into(),
        });
        assert_eq!(unhealthy.exit_code(), exit_code::UNHEALTHY);

        let refused = CliError::from(CoreError::ConnectionFailed {
            url: "http://s/".into(),
            reason: "refused".into(),
        });
        assert_eq!(refused.exit_code(), exit_code::CONNECTION);

        let timeout = CliError::from(CoreError::Timeout {
            url: "http://s/".into(),
        });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let html = CliError::from(CoreError::UnexpectedContentType {
            url: "http://s/".into(),
            content_type: "text/html".into(),
        });
        assert_eq!(html.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn config_errors_are_usage_errors() {
        assert_eq!(
            CliError::from(ConfigError::MissingUrl).exit_code(),
            exit_code::USAGE
        );
        let invalid = CliError::from(ConfigError::Validation {
            field: "update_interval".into(),
            reason: "must be at least 1 minute".into(),
        });
        assert_eq!(invalid.exit_code(), exit_code::USAGE);
    }
}
