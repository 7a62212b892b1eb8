use serde::{Deserialize, Serialize};

/// One row of the timetable, flattened from the raw API item for the
/// direction it was fetched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub id: String,
    pub flight_number: String,
    pub airline: String,
    /// Destination for departures, origin for arrivals.
    pub city: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Departure,
    Arrival,
}

impl Direction {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Direction::Departure => "departure",
            Direction::Arrival => "arrival",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Departure => "Departures",
            Direction::Arrival => "Arrivals",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    FlightNumber,
    Airline,
    City,
    Time,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::FlightNumber,
        SortField::Airline,
        SortField::City,
        SortField::Time,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::FlightNumber => "Flight",
            SortField::Airline => "Airline",
            SortField::City => "City",
            SortField::Time => "Time",
        }
    }

    /// The string the comparator sees for this column.
    pub fn key(self, record: &FlightRecord) -> &str {
        match self {
            SortField::FlightNumber => &record.flight_number,
            SortField::Airline => &record.airline,
            SortField::City => &record.city,
            SortField::Time => &record.time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}
