//! `spoolwatch status`: the printer's active spool and firmware version.

use std::fmt::Write as _;

use serde::Serialize;

use spoolwatch_core::{Poller, SpoolReport, SpoolSelection};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusView {
    klipper_configured: bool,
    active_spool: Option<SpoolSelection>,
    api_version: Option<String>,
    spool: Option<SpoolReport>,
}

pub async fn handle(poller: &Poller, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = poller.poll_once().await;

    let view = StatusView {
        klipper_configured: snapshot.klipper.is_some(),
        active_spool: snapshot.klipper.as_ref().map(|k| k.active_spool),
        api_version: snapshot.klipper.as_ref().and_then(|k| k.api_version.clone()),
        spool: snapshot.active_spool().cloned(),
    };

    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &view, |v| detail(v, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(view: &StatusView, color: bool) -> String {
    let mut out = String::new();
    if !view.klipper_configured {
        let _ = writeln!(out, "Printer:      not configured (set --klipper-url)");
        return out.trim_end().to_owned();
    }

    let selection = view
        .active_spool
        .map_or_else(|| "unknown".to_owned(), |s| s.to_string());
    let _ = writeln!(out, "Active spool: {selection}");
    let _ = writeln!(
        out,
        "API version:  {}",
        view.api_version.as_deref().unwrap_or("unknown")
    );

    if let Some(ref report) = view.spool {
        let _ = writeln!(out, "Spool:        {}", report.spool.display_name());
        let _ = writeln!(
            out,
            "Remaining:    {} ({})",
            output::format_grams(report.spool.remaining_weight),
            output::format_pct(report.remaining_pct)
        );
        let _ = writeln!(out, "Level:        {}", output::paint_level(report.level, color));
    }
    out.trim_end().to_owned()
}
