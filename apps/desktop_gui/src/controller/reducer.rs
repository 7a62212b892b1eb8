//! Folds user actions and backend events into the flight board.

use client_core::{view::ViewAction, FetchTicket, FlightBoard};
use crossbeam_channel::Sender;
use shared::error::{FetchFailure, FetchFailureKind};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};

pub struct Controller {
    board: FlightBoard,
    cmd_tx: Sender<BackendCommand>,
    status: String,
    banner: Option<UiError>,
}

impl Controller {
    pub fn new(board: FlightBoard, cmd_tx: Sender<BackendCommand>) -> Self {
        Self {
            board,
            cmd_tx,
            status: "Starting".to_string(),
            banner: None,
        }
    }

    pub fn board(&self) -> &FlightBoard {
        &self.board
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn banner(&self) -> Option<&UiError> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Issues the fetch for the initial view state.
    pub fn start(&mut self) {
        let ticket = self.board.initial_fetch();
        self.request(ticket);
    }

    pub fn apply(&mut self, action: ViewAction) {
        tracing::trace!(?action, "applying view action");
        if let Some(ticket) = self.board.dispatch(action) {
            self.request(ticket);
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(err) => {
                tracing::warn!(context = ?err.context(), "{}", err.message());
                self.status = err.message().to_string();
                self.banner = Some(err);
            }
            UiEvent::FlightsLoaded {
                generation,
                records,
            } => {
                let count = records.len();
                if self.board.apply_fetch(generation, Ok(records)) {
                    self.status = format!("Loaded {count} flights");
                }
            }
            UiEvent::FetchFailed {
                generation,
                failure,
            } => {
                let detail = failure.detail.clone();
                if self.board.apply_fetch(generation, Err(failure)) {
                    self.status = format!("Fetch failed: {detail}");
                }
            }
        }
    }

    fn request(&mut self, ticket: FetchTicket) {
        let generation = ticket.generation;
        let direction = ticket.query.direction;
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchFlights(ticket),
            &mut self.status,
        ) {
            self.status = format!("Loading {}...", direction.label().to_lowercase());
        } else {
            let failure = FetchFailure::new(FetchFailureKind::Transport, self.status.clone());
            self.banner = Some(UiError::from_message(
                UiErrorContext::Fetch,
                self.status.clone(),
            ));
            self.board.apply_fetch(generation, Err(failure));
        }
    }
}
