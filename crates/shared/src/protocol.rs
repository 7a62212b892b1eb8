//! Wire shapes of the airport timetable API and their normalization into
//! [`FlightRecord`]s.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{Direction, FlightRecord};

pub const INVALID_DATE_LABEL: &str = "Invalid date";

const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Top-level payload. `items` stays optional here so the client can tell a
/// missing array apart from an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableResponse {
    #[serde(default)]
    pub items: Option<Vec<Value>>,
}

/// Identifier-like fields arrive as either JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    pub fn into_string(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCompany {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// `mar1` is the origin leg, `mar2` the destination leg.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRoutePoint {
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<String>,
    /// Scheduled departure time (read on `mar1`).
    #[serde(default, deserialize_with = "lenient")]
    pub dt: Option<String>,
    /// Scheduled arrival time (read on `mar2`).
    #[serde(default, deserialize_with = "lenient")]
    pub at: Option<String>,
}

/// Only `i_id` and `flt` are strict. Every other field reads as absent when
/// its JSON type is unexpected, so a quirk in a leg the direction never looks
/// at cannot drop the row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTimetableItem {
    pub i_id: Option<Scalar>,
    pub flt: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub co: Option<RawCompany>,
    #[serde(default, deserialize_with = "lenient")]
    pub mar1: Option<RawRoutePoint>,
    #[serde(default, deserialize_with = "lenient")]
    pub mar2: Option<RawRoutePoint>,
    #[serde(default, deserialize_with = "lenient")]
    pub estimated_chin_start: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl RawTimetableItem {
    /// Maps one raw item; `None` when the item has no id or flight number.
    pub fn normalize(self, direction: Direction) -> Option<FlightRecord> {
        let id = self.i_id?.into_string();
        let flight_number = self.flt?.into_string();
        let airline = self.co.and_then(|co| co.name).unwrap_or_default();

        let (city, primary_time) = match direction {
            Direction::Departure => {
                let leg = self.mar2.unwrap_or_default();
                (leg.city, leg.at)
            }
            Direction::Arrival => {
                let leg = self.mar1.unwrap_or_default();
                (leg.city, leg.dt)
            }
        };

        let time = primary_time
            .filter(|time| !time.is_empty())
            .or(self.estimated_chin_start)
            .unwrap_or_default();

        Some(FlightRecord {
            id,
            flight_number,
            airline,
            city: city.unwrap_or_default(),
            time,
        })
    }
}

/// Normalizes every usable item of a response, dropping (and logging) the
/// ones that cannot become a [`FlightRecord`].
pub fn normalize_items(direction: Direction, items: Vec<Value>) -> Vec<FlightRecord> {
    let total = items.len();
    let records: Vec<FlightRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let raw = match serde_json::from_value::<RawTimetableItem>(value) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(index, "skipping undecodable timetable item: {err}");
                    return None;
                }
            };
            let record = raw.normalize(direction);
            if record.is_none() {
                warn!(index, "skipping timetable item without i_id or flt");
            }
            record
        })
        .collect();

    if records.len() != total {
        warn!(
            kept = records.len(),
            total, "timetable response contained unusable items"
        );
    }
    records
}

/// Parses the timestamp formats the API is known to emit. Offset-aware values
/// are converted to UTC so they order correctly against each other.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Formats a record's time for the table. Zoned timestamps are shown in local
/// time, naive ones as given.
pub fn display_time(raw: &str) -> String {
    const DISPLAY_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return parsed
            .with_timezone(&Local)
            .format(DISPLAY_FORMAT)
            .to_string();
    }
    match parse_timestamp(raw) {
        Some(naive) => naive.format(DISPLAY_FORMAT).to_string(),
        None => INVALID_DATE_LABEL.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
