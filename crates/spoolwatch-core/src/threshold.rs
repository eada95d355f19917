// ── Remaining-filament notification thresholds ──

use std::fmt;

use serde::Serialize;

/// Severity of a spool's fill level, least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Ok,
    Info,
    Warning,
    Critical,
}

impl NotificationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage thresholds (0-100) at or below which a spool is reported at
/// the corresponding level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub info: u8,
    pub warning: u8,
    pub critical: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            info: 20,
            warning: 10,
            critical: 5,
        }
    }
}

impl Thresholds {
    /// Classify a remaining percentage.
    ///
    /// Returns the most severe level whose threshold `remaining_pct` is at
    /// or below. Unknown fill levels are never flagged.
    pub fn classify(&self, remaining_pct: Option<f64>) -> NotificationLevel {
        let Some(pct) = remaining_pct else {
            return NotificationLevel::Ok;
        };

        if pct <= f64::from(self.critical) {
            NotificationLevel::Critical
        } else if pct <= f64::from(self.warning) {
            NotificationLevel::Warning
        } else if pct <= f64::from(self.info) {
            NotificationLevel::Info
        } else {
            NotificationLevel::Ok
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> Thresholds {
        Thresholds {
            info: 30,
            warning: 15,
            critical: 5,
        }
    }

    #[test]
    fn above_every_threshold_is_ok() {
        assert_eq!(t().classify(Some(30.1)), NotificationLevel::Ok);
        assert_eq!(t().classify(Some(100.0)), NotificationLevel::Ok);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(t().classify(Some(30.0)), NotificationLevel::Info);
        assert_eq!(t().classify(Some(15.0)), NotificationLevel::Warning);
        assert_eq!(t().classify(Some(5.0)), NotificationLevel::Critical);
    }

    #[test]
    fn between_thresholds() {
        assert_eq!(t().classify(Some(20.0)), NotificationLevel::Info);
        assert_eq!(t().classify(Some(14.9)), NotificationLevel::Warning);
        assert_eq!(t().classify(Some(0.0)), NotificationLevel::Critical);
    }

    #[test]
    fn zero_threshold_only_fires_when_empty() {
        let t = Thresholds {
            info: 0,
            warning: 0,
            critical: 0,
        };
        assert_eq!(t.classify(Some(0.5)), NotificationLevel::Ok);
        assert_eq!(t.classify(Some(0.0)), NotificationLevel::Critical);
    }

    #[test]
    fn unknown_percentage_is_ok() {
        assert_eq!(t().classify(None), NotificationLevel::Ok);
    }

    #[test]
    fn most_severe_wins_when_thresholds_overlap() {
        let t = Thresholds {
            info: 10,
            warning: 10,
            critical: 10,
        };
        assert_eq!(t.classify(Some(8.0)), NotificationLevel::Critical);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(NotificationLevel::Critical > NotificationLevel::Warning);
        assert!(NotificationLevel::Warning > NotificationLevel::Info);
        assert!(NotificationLevel::Info > NotificationLevel::Ok);
    }
}
