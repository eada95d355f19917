//! `spoolwatch check`: validate the Spoolman endpoint.

use serde::Serialize;

use spoolwatch_core::Poller;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub url: String,
    pub status: String,
    pub healthy: bool,
}

/// Run the Spoolman health check. Each failure kind maps to its own
/// `CliError` variant (and exit code).
pub async fn health(poller: &Poller) -> Result<CheckResult, CliError> {
    let health = poller.check_health().await?;
    Ok(CheckResult {
        url: poller.config().spoolman_url.clone(),
        healthy: health.is_healthy(),
        status: health.status,
    })
}

pub async fn handle(poller: &Poller, global: &GlobalOpts) -> Result<(), CliError> {
    let result = health(poller).await?;
    let out = output::render_single(global.output, &result, |r| {
        format!("Spoolman at {} is {}", r.url, r.status)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
