// Spoolman wire models
//
// Spoolman returns rich records; only the fields needed for inventory and
// threshold reporting are modelled. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Body of `GET api/v1/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Filament manufacturer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Vendor {
    pub id: Option<i64>,
    pub name: String,
}

/// Filament type a spool is made of.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Filament {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub material: Option<String>,
    pub vendor: Option<Vendor>,
    /// Net filament weight of a full spool, in grams.
    pub weight: Option<f64>,
    pub color_hex: Option<String>,
}

/// A single spool from `GET api/v1/spool`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Spool {
    pub id: i64,
    pub filament: Option<Filament>,
    /// Grams left on the spool.
    pub remaining_weight: Option<f64>,
    /// Net weight when the spool was new; falls back to the filament's
    /// weight when unset.
    pub initial_weight: Option<f64>,
    pub used_weight: Option<f64>,
    #[serde(default)]
    pub archived: bool,
    pub location: Option<String>,
    pub lot_nr: Option<String>,
    pub comment: Option<String>,
}

impl Spool {
    /// Weight of the spool when full, in grams.
    pub fn full_weight(&self) -> Option<f64> {
        self.initial_weight
            .or_else(|| self.filament.as_ref().and_then(|f| f.weight))
    }

    /// Remaining filament as a percentage of the full weight.
    ///
    /// `None` if either weight is unknown or the full weight is not positive.
    pub fn remaining_percentage(&self) -> Option<f64> {
        let remaining = self.remaining_weight?;
        let full = self.full_weight()?;
        if full <= 0.0 {
            return None;
        }
        Some((remaining * 100.0 / full).clamp(0.0, 100.0))
    }

    /// Human-readable label: vendor, filament name and material, or the id.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = self
            .filament
            .as_ref()
            .map(|f| {
                [
                    f.vendor.as_ref().map(|v| v.name.as_str()),
                    f.name.as_deref(),
                    f.material.as_deref(),
                ]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect()
            })
            .unwrap_or_default();

        if parts.is_empty() {
            format!("Spool #{}", self.id)
        } else {
            parts.join(" ")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spool(value: serde_json::Value) -> Spool {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn percentage_from_initial_weight() {
        let s = spool(json!({"id": 1, "remaining_weight": 250.0, "initial_weight": 1000.0}));
        assert_eq!(s.remaining_percentage(), Some(25.0));
    }

    #[test]
    fn percentage_falls_back_to_filament_weight() {
        let s = spool(json!({
            "id": 2,
            "remaining_weight": 100.0,
            "filament": {"weight": 500.0}
        }));
        assert_eq!(s.remaining_percentage(), Some(20.0));
    }

    #[test]
    fn percentage_unknown_without_weights() {
        assert_eq!(spool(json!({"id": 3})).remaining_percentage(), None);
        let zero = spool(json!({"id": 4, "remaining_weight": 10.0, "initial_weight": 0.0}));
        assert_eq!(zero.remaining_percentage(), None);
    }

    #[test]
    fn display_name_joins_known_parts() {
        let s = spool(json!({
            "id": 5,
            "filament": {
                "name": "Galaxy Black",
                "material": "PLA",
                "vendor": {"name": "Prusament"}
            }
        }));
        assert_eq!(s.display_name(), "Prusament Galaxy Black PLA");
        assert_eq!(spool(json!({"id": 6})).display_name(), "Spool #6");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let s = spool(json!({
            "id": 7,
            "registered": "2024-01-01T00:00:00Z",
            "extra": {"nfc": "abc"},
            "archived": true
        }));
        assert!(s.archived);
    }
}
