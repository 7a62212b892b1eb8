use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use shared::{
    domain::{Direction, FlightRecord},
    error::FetchFailure,
    protocol::{normalize_items, TimetableResponse},
};
use tracing::{debug, error};
use url::Url;

pub mod board;
pub mod error;
pub mod pipeline;
pub mod view;

pub use board::{FetchTicket, FlightBoard};
pub use error::FetchError;

pub const DEFAULT_TIMETABLE_URL: &str = "https://www.svo.aero/bitrix/timetable/";
pub const DEFAULT_LOCALE: &str = "ru";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchQuery {
    pub direction: Direction,
    pub date: Option<NaiveDate>,
}

/// Names of the query parameters carrying the date range. Deployments of the
/// timetable endpoint have been seen with both pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateParamStyle {
    /// `dateStart` / `dateEnd`
    #[default]
    StartEnd,
    /// `from` / `to`
    FromTo,
}

impl DateParamStyle {
    pub fn names(self) -> (&'static str, &'static str) {
        match self {
            DateParamStyle::StartEnd => ("dateStart", "dateEnd"),
            DateParamStyle::FromTo => ("from", "to"),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "start_end" | "datestart" | "date_start_end" => Some(DateParamStyle::StartEnd),
            "from_to" | "from" => Some(DateParamStyle::FromTo),
            _ => None,
        }
    }
}

/// `[00:00:00.000Z, 23:59:59.999Z]` of `date`, ISO formatted.
pub fn day_bounds(date: NaiveDate) -> (String, String) {
    const ISO_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
    let start = date.and_hms_milli_opt(0, 0, 0, 0);
    let end = date.and_hms_milli_opt(23, 59, 59, 999);
    match (start, end) {
        (Some(start), Some(end)) => (
            start.format(ISO_MILLIS).to_string(),
            end.format(ISO_MILLIS).to_string(),
        ),
        _ => {
            let day = date.format("%Y-%m-%d").to_string();
            (day.clone(), day)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub locale: String,
    pub timeout: Duration,
    pub date_params: DateParamStyle,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            locale: DEFAULT_LOCALE.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            date_params: DateParamStyle::default(),
        }
    }
}

#[async_trait]
pub trait TimetableSource: Send + Sync {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<FlightRecord>, FetchError>;
}

pub struct TimetableClient {
    http: Client,
    config: ClientConfig,
}

impl TimetableClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn query_params(&self, query: &FetchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("direction", query.direction.as_query_value().to_string()),
            ("locale", self.config.locale.clone()),
        ];
        if let Some(date) = query.date {
            let (start_name, end_name) = self.config.date_params.names();
            let (start, end) = day_bounds(date);
            params.push((start_name, start));
            params.push((end_name, end));
        }
        params
    }
}

#[async_trait]
impl TimetableSource for TimetableClient {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<FlightRecord>, FetchError> {
        let response = self
            .http
            .get(self.config.base_url.clone())
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        debug!(body = %String::from_utf8_lossy(&body), "timetable response body");

        let payload: TimetableResponse = serde_json::from_slice(&body)?;
        let items = payload.items.ok_or(FetchError::MissingItems)?;
        debug!(
            direction = query.direction.as_query_value(),
            items = items.len(),
            "timetable response received"
        );

        Ok(normalize_items(query.direction, items))
    }
}

/// Runs a ticket against `source`, logging the failure and reducing it to what
/// the view needs.
pub async fn execute_ticket<S>(
    source: &S,
    ticket: &FetchTicket,
) -> Result<Vec<FlightRecord>, FetchFailure>
where
    S: TimetableSource + ?Sized,
{
    source.fetch(&ticket.query).await.map_err(|err| {
        error!(
            generation = ticket.generation,
            timeout = err.is_timeout(),
            "timetable fetch failed: {err}"
        );
        FetchFailure::from(err)
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
