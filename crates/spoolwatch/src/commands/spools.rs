//! `spoolwatch spools`: inventory with remaining filament.

use tabled::Tabled;

use spoolwatch_core::{NotificationLevel, Poller, SpoolReport};

use crate::cli::{GlobalOpts, LevelFilter, SpoolsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SpoolRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Spool")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "%")]
    pct: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<LevelFilter> for NotificationLevel {
    fn from(level: LevelFilter) -> Self {
        match level {
            LevelFilter::Info => Self::Info,
            LevelFilter::Warning => Self::Warning,
            LevelFilter::Critical => Self::Critical,
        }
    }
}

pub async fn handle(
    poller: &Poller,
    args: &SpoolsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let include_archived = args.archived || poller.config().show_archived;
    let active_id = poller
        .klipper_status()
        .await
        .and_then(|status| status.active_spool.spool_id());

    let mut reports = poller.spools(include_archived, active_id).await?;
    if let Some(min) = args.level {
        let min = NotificationLevel::from(min);
        reports.retain(|r| r.level >= min);
    }
    tracing::debug!(count = reports.len(), "listing spools");

    let color = output::should_color(global.color);
    let out = output::render_list(
        global.output,
        &reports,
        |r| to_row(r, color),
        |r| {
            format!(
                "{}\t{}\t{}",
                r.spool.id,
                r.remaining_pct.map_or_else(String::new, |p| format!("{p:.1}")),
                r.level
            )
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn to_row(report: &SpoolReport, color: bool) -> SpoolRow {
    SpoolRow {
        id: report.spool.id,
        name: report.spool.display_name(),
        location: report.spool.location.clone().unwrap_or_default(),
        remaining: output::format_grams(report.spool.remaining_weight),
        pct: output::format_pct(report.remaining_pct),
        level: output::paint_level(report.level, color),
        active: if report.active { "*" } else { "" },
    }
}
