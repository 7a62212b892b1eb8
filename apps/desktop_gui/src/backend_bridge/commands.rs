//! Backend commands queued from UI to backend worker.

use client_core::FetchTicket;

#[derive(Debug)]
pub enum BackendCommand {
    FetchFlights(FetchTicket),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchFlights(_) => "fetch_flights",
        }
    }
}
