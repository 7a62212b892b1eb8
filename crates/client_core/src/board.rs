use shared::{domain::FlightRecord, error::FetchFailure};
use tracing::{debug, info, warn};

use crate::{
    pipeline::{self, PageView},
    view::{reduce, ViewAction, ViewState},
    FetchQuery,
};

pub const NO_DATA_MESSAGE: &str = "No data";

/// A fetch the board is waiting on. Only the ticket with the newest
/// generation may change the record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: FetchQuery,
}

/// Owns the view state and the record snapshot of the latest accepted fetch.
#[derive(Debug, Default)]
pub struct FlightBoard {
    view: ViewState,
    records: Vec<FlightRecord>,
    failure: Option<FetchFailure>,
    latest_generation: u64,
    in_flight: Option<u64>,
}

impl FlightBoard {
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        self.failure.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Ticket for the fetch the current state needs (app start).
    pub fn initial_fetch(&mut self) -> FetchTicket {
        let query = self.view.fetch_query();
        self.begin_fetch(query)
    }

    pub fn begin_fetch(&mut self, query: FetchQuery) -> FetchTicket {
        self.latest_generation += 1;
        self.in_flight = Some(self.latest_generation);
        debug!(
            generation = self.latest_generation,
            direction = query.direction.as_query_value(),
            date = ?query.date,
            "issuing timetable fetch"
        );
        FetchTicket {
            generation: self.latest_generation,
            query,
        }
    }

    /// Applies a user action; returns the fetch to run when the action
    /// changed direction or date.
    pub fn dispatch(&mut self, action: ViewAction) -> Option<FetchTicket> {
        let transition = reduce(&self.view, action, self.total_pages());
        self.view = transition.state;
        transition.fetch.map(|query| self.begin_fetch(query))
    }

    /// Folds a fetch outcome into the snapshot. Returns `false` when the
    /// outcome belongs to a superseded request and was dropped.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        outcome: Result<Vec<FlightRecord>, FetchFailure>,
    ) -> bool {
        if generation != self.latest_generation {
            debug!(
                generation,
                latest = self.latest_generation,
                "discarding stale timetable response"
            );
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(records) => {
                info!(generation, count = records.len(), "timetable snapshot replaced");
                self.records = records;
                self.failure = None;
            }
            Err(failure) => {
                warn!(generation, "timetable fetch failed: {failure}");
                self.records.clear();
                self.failure = Some(failure);
            }
        }
        true
    }

    pub fn page_view(&self) -> PageView<'_> {
        pipeline::run(&self.records, &self.view)
    }

    pub fn total_pages(&self) -> usize {
        let matches = pipeline::filter(&self.records, &self.view.search).len();
        pipeline::total_pages(matches, self.view.items_per_page)
    }

    /// What the table body shows when the current page has no rows.
    pub fn empty_message(&self) -> &str {
        self.failure
            .as_ref()
            .map_or(NO_DATA_MESSAGE, FetchFailure::user_message)
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
