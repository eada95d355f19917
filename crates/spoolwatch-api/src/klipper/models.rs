// Moonraker wire models and the active-spool selection type

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Moonraker response envelope: `{ "result": T }`.
///
/// A missing `result` deserializes as `None`; callers treat that the same
/// as an empty result object.
#[derive(Debug, Deserialize)]
pub(crate) struct MoonrakerResponse<T> {
    pub result: Option<T>,
}

/// `result` payload of `GET server/spoolman/spool_id`.
///
/// Kept as a raw JSON value because Moonraker has reported the id both as
/// a number and as a string across releases.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SpoolIdResult {
    #[serde(default)]
    pub spool_id: Option<Value>,
}

impl SpoolIdResult {
    /// Interpret the raw id: `Ok(None)` for absent/null, `Ok(Some(id))`
    /// for an integer or integer string.
    pub fn parse(self) -> Result<Option<i64>, Error> {
        match self.spool_id {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or(Error::MissingField { field: "spool_id" }),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| Error::MissingField { field: "spool_id" }),
            Some(_) => Err(Error::MissingField { field: "spool_id" }),
        }
    }
}

/// `result` payload of `GET server/info`.
///
/// Only the fields we surface are modelled; everything else Moonraker
/// sends is ignored. A field with an unexpected type reads as `None`
/// instead of failing the whole decode.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub api_version_string: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub moonraker_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub klippy_state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub klippy_connected: Option<bool>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// The active spool as reported by the printer firmware.
///
/// `Selected(0)` is a real spool id. A failed fetch is its own variant so
/// that it can never be mistaken for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", content = "spool_id", rename_all = "snake_case")]
pub enum SpoolSelection {
    /// A spool is loaded; carries its Spoolman id.
    Selected(i64),
    /// The firmware answered, but no spool is selected.
    NoSelection,
    /// The firmware could not be queried or answered with garbage.
    FetchFailed,
}

impl SpoolSelection {
    /// The selected spool id, if any.
    pub fn spool_id(&self) -> Option<i64> {
        match self {
            Self::Selected(id) => Some(*id),
            Self::NoSelection | Self::FetchFailed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::FetchFailed)
    }
}

impl From<Option<i64>> for SpoolSelection {
    fn from(id: Option<i64>) -> Self {
        id.map_or(Self::NoSelection, Self::Selected)
    }
}

impl fmt::Display for SpoolSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selected(id) => write!(f, "{id}"),
            Self::NoSelection => f.write_str("none"),
            Self::FetchFailed => f.write_str("unknown"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(body: Value) -> Result<Option<i64>, Error> {
        let resp: MoonrakerResponse<SpoolIdResult> = serde_json::from_value(body).unwrap();
        resp.result.unwrap_or_default().parse()
    }

    #[test]
    fn integer_id() {
        assert_eq!(parse(json!({"result": {"spool_id": 42}})).unwrap(), Some(42));
    }

    #[test]
    fn zero_is_a_valid_id() {
        assert_eq!(parse(json!({"result": {"spool_id": 0}})).unwrap(), Some(0));
    }

    #[test]
    fn null_and_missing_mean_no_selection() {
        assert_eq!(parse(json!({"result": {"spool_id": null}})).unwrap(), None);
        assert_eq!(parse(json!({"result": {}})).unwrap(), None);
        assert_eq!(parse(json!({})).unwrap(), None);
    }

    #[test]
    fn numeric_string_is_accepted() {
        assert_eq!(parse(json!({"result": {"spool_id": " 7 "}})).unwrap(), Some(7));
    }

    #[test]
    fn garbage_ids_are_errors() {
        assert!(parse(json!({"result": {"spool_id": "seven"}})).is_err());
        assert!(parse(json!({"result": {"spool_id": 1.5}})).is_err());
        assert!(parse(json!({"result": {"spool_id": [1]}})).is_err());
    }

    #[test]
    fn selection_serializes_tagged() {
        assert_eq!(
            serde_json::to_value(SpoolSelection::Selected(3)).unwrap(),
            json!({"state": "selected", "spool_id": 3})
        );
        assert_eq!(
            serde_json::to_value(SpoolSelection::FetchFailed).unwrap(),
            json!({"state": "fetch_failed"})
        );
    }

    #[test]
    fn server_info_tolerates_odd_field_types() {
        let info: ServerInfo = serde_json::from_value(json!({
            "api_version_string": "1.5.0",
            "moonraker_version": 17,
            "klippy_state": null,
            "klippy_connected": "yes"
        }))
        .unwrap();
        assert_eq!(info.api_version_string.as_deref(), Some("1.5.0"));
        assert_eq!(info.moonraker_version, None);
        assert_eq!(info.klippy_state, None);
        assert_eq!(info.klippy_connected, None);
    }

    #[test]
    fn selection_display() {
        assert_eq!(SpoolSelection::Selected(0).to_string(), "0");
        assert_eq!(SpoolSelection::NoSelection.to_string(), "none");
        assert_eq!(SpoolSelection::FetchFailed.to_string(), "unknown");
    }
}
