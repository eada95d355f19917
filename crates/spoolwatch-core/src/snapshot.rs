// ── Poll results ──
//
// A `Snapshot` is everything one poll learned. Snapshots are immutable and
// shared behind `Arc` once published.

use chrono::{DateTime, Utc};
use serde::Serialize;

use spoolwatch_api::{Spool, SpoolSelection};

use crate::threshold::{NotificationLevel, Thresholds};

/// What the printer firmware reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KlipperStatus {
    pub active_spool: SpoolSelection,
    pub api_version: Option<String>,
}

/// One spool with its fill level classified.
#[derive(Debug, Clone, Serialize)]
pub struct SpoolReport {
    pub spool: Spool,
    pub remaining_pct: Option<f64>,
    pub level: NotificationLevel,
    /// Whether this is the spool the printer has loaded.
    pub active: bool,
}

impl SpoolReport {
    pub fn new(spool: Spool, thresholds: &Thresholds, active_id: Option<i64>) -> Self {
        let remaining_pct = spool.remaining_percentage();
        let level = thresholds.classify(remaining_pct);
        let active = active_id == Some(spool.id);
        Self {
            spool,
            remaining_pct,
            level,
            active,
        }
    }
}

/// The result of one poll.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    /// `None` when no Klipper endpoint is configured.
    pub klipper: Option<KlipperStatus>,
    /// `None` when the spool listing failed this round.
    pub spools: Option<Vec<SpoolReport>>,
}

impl Snapshot {
    /// The spool report for the printer's active spool, if it is known.
    pub fn active_spool(&self) -> Option<&SpoolReport> {
        self.spools.as_ref()?.iter().find(|r| r.active)
    }

    /// Spools at or above `min` severity, most severe first.
    pub fn alerts(&self, min: NotificationLevel) -> Vec<&SpoolReport> {
        let mut alerts: Vec<&SpoolReport> = self
            .spools
            .iter()
            .flatten()
            .filter(|r| r.level >= min && r.level > NotificationLevel::Ok)
            .collect();
        alerts.sort_by(|a, b| b.level.cmp(&a.level).then(a.spool.id.cmp(&b.spool.id)));
        alerts
    }

    /// Level of `spool_id` in this snapshot, if present.
    pub fn level_of(&self, spool_id: i64) -> Option<NotificationLevel> {
        self.spools
            .as_ref()?
            .iter()
            .find(|r| r.spool.id == spool_id)
            .map(|r| r.level)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spool(id: i64, remaining: f64) -> Spool {
        serde_json::from_value(json!({
            "id": id,
            "remaining_weight": remaining,
            "initial_weight": 1000.0
        }))
        .unwrap()
    }

    fn snapshot(active: Option<i64>) -> Snapshot {
        let thresholds = Thresholds::default();
        Snapshot {
            taken_at: Utc::now(),
            klipper: None,
            spools: Some(vec![
                SpoolReport::new(spool(1, 900.0), &thresholds, active),
                SpoolReport::new(spool(2, 30.0), &thresholds, active),
                SpoolReport::new(spool(3, 150.0), &thresholds, active),
                SpoolReport::new(spool(4, 80.0), &thresholds, active),
            ]),
        }
    }

    #[test]
    fn alerts_sorted_most_severe_first() {
        let snap = snapshot(None);
        let ids: Vec<i64> = snap
            .alerts(NotificationLevel::Info)
            .iter()
            .map(|r| r.spool.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 3]);
    }

    #[test]
    fn alerts_respect_minimum() {
        let snap = snapshot(None);
        assert_eq!(snap.alerts(NotificationLevel::Critical).len(), 1);
        assert_eq!(snap.alerts(NotificationLevel::Ok).len(), 3);
    }

    #[test]
    fn active_spool_is_marked() {
        let snap = snapshot(Some(3));
        assert_eq!(snap.active_spool().map(|r| r.spool.id), Some(3));
        assert!(snapshot(None).active_spool().is_none());
    }

    #[test]
    fn level_lookup() {
        let snap = snapshot(None);
        assert_eq!(snap.level_of(2), Some(NotificationLevel::Critical));
        assert_eq!(snap.level_of(99), None);
    }
}
