//! `spoolwatch watch`: run the poller and print every snapshot.

use std::fmt::Write as _;

use tracing::info;

use spoolwatch_core::{NotificationLevel, Poller, Snapshot};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(poller: &Poller, _args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut rx = poller.subscribe();
    poller.start().await;
    info!(
        spoolman = %poller.config().spoolman_url,
        interval_mins = poller.config().update_interval.as_secs() / 60,
        "watching, press Ctrl-C to stop"
    );

    let color = output::should_color(global.color);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Ok(()),
            changed = rx.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let latest = rx.borrow_and_update().clone();
                let Some(snapshot) = latest else { continue };
                let rendered = output::render_single(global.output, snapshot.as_ref(), |s| {
                    summary(s, color)
                });
                match rendered {
                    Ok(out) => output::print_output(&out, global.quiet),
                    Err(e) => break Err(e),
                }
            }
        }
    };

    poller.shutdown().await;
    result
}

/// One header line plus one line per low spool.
fn summary(snapshot: &Snapshot, color: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "[{}]", snapshot.taken_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(ref k) = snapshot.klipper {
        match snapshot.active_spool() {
            Some(report) => {
                let _ = write!(
                    out,
                    " active: #{} {} {}",
                    report.spool.id,
                    report.spool.display_name(),
                    output::format_pct(report.remaining_pct)
                );
            }
            None => {
                let _ = write!(out, " active: {}", k.active_spool);
            }
        }
    }

    let Some(ref spools) = snapshot.spools else {
        let _ = write!(out, " spools: unavailable");
        return out;
    };

    let alerts = snapshot.alerts(NotificationLevel::Info);
    let _ = write!(out, " spools: {} ({} low)", spools.len(), alerts.len());
    for report in alerts {
        let _ = write!(
            out,
            "\n  {:<8} #{} {} {}",
            output::paint_level(report.level, color),
            report.spool.id,
            report.spool.display_name(),
            output::format_pct(report.remaining_pct)
        );
    }
    out
}
