// Usage record domain model
use super::error::{DashboardError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder used for any dimension field missing from a record
pub const UNKNOWN: &str = "Unknown";

/// One billing/usage event as a flat field map.
///
/// Fields are kept as raw JSON values so that records carrying columns
/// unknown to the engine survive a load/serve round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Render a field as a grouping label, `"Unknown"` when absent or null
    pub fn label(&self, field: &str) -> String {
        match self.0.get(field) {
            None | Some(Value::Null) => UNKNOWN.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// The `date` field exactly as stored
    pub fn date_text(&self) -> Result<&str> {
        match self.0.get("date") {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(DashboardError::Parse(format!(
                "record date is not a string: {}",
                other
            ))),
            None => Err(DashboardError::Parse("record has no date".into())),
        }
    }

    pub fn date(&self) -> Result<NaiveDate> {
        parse_date(self.date_text()?)
    }

    /// Consumption amount; anything non-numeric counts as zero
    pub fn consumption(&self) -> f64 {
        self.0
            .get("consumption")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn budget(&self) -> Value {
        self.0.get("budget").cloned().unwrap_or(Value::Null)
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    // chrono tolerates padding and signed years; only plain digits pass here
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DashboardError::Parse(format!("invalid date '{}'", value)));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| DashboardError::Parse(format!("invalid date '{}': {}", value, e)))
}
