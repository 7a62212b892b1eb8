//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{execute_ticket, ClientConfig, FetchTicket, TimetableClient, TimetableSource};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    client_config: ClientConfig,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match TimetableClient::new(client_config) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build http client: {err}"),
                )));
                tracing::error!("failed to build timetable http client: {err}");
                return;
            }
        };
        tracing::info!(endpoint = %client.config().base_url, "backend worker ready");
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        serve_commands(&runtime, &cmd_rx, &ui_tx, client);
        tracing::info!("ui command queue closed; backend worker exiting");
    })
}

/// Each fetch runs on its own task so a hung request never holds back a
/// newer one; the board drops whichever answer is stale.
fn serve_commands<S>(
    runtime: &tokio::runtime::Runtime,
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
    source: Arc<S>,
) where
    S: TimetableSource + 'static,
{
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::FetchFlights(ticket) => {
                let source = Arc::clone(&source);
                let ui_tx = ui_tx.clone();
                runtime.spawn(async move {
                    let event = run_fetch(source.as_ref(), ticket).await;
                    if ui_tx.send(event).is_err() {
                        tracing::debug!("ui event queue closed before fetch completed");
                    }
                });
            }
        }
    }
}

async fn run_fetch<S>(source: &S, ticket: FetchTicket) -> UiEvent
where
    S: TimetableSource + ?Sized,
{
    match execute_ticket(source, &ticket).await {
        Ok(records) => UiEvent::FlightsLoaded {
            generation: ticket.generation,
            records,
        },
        Err(failure) => UiEvent::FetchFailed {
            generation: ticket.generation,
            failure,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use client_core::{FetchError, FetchQuery};
    use crossbeam_channel::bounded;
    use shared::{
        domain::{Direction, FlightRecord},
        error::FetchFailureKind,
    };
    use std::time::Duration;

    /// Departures succeed with one row, arrivals come back without `items`.
    struct ScriptedSource;

    #[async_trait]
    impl TimetableSource for ScriptedSource {
        async fn fetch(&self, query: &FetchQuery) -> Result<Vec<FlightRecord>, FetchError> {
            match query.direction {
                Direction::Departure => Ok(vec![FlightRecord {
                    id: "1".to_string(),
                    flight_number: "SU 1402".to_string(),
                    airline: "Aeroflot".to_string(),
                    city: "Sochi".to_string(),
                    time: String::new(),
                }]),
                Direction::Arrival => Err(FetchError::MissingItems),
            }
        }
    }

    fn ticket(generation: u64, direction: Direction) -> FetchTicket {
        FetchTicket {
            generation,
            query: FetchQuery {
                direction,
                date: None,
            },
        }
    }

    #[test]
    fn fetch_commands_come_back_as_tagged_ui_events() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);

        cmd_tx
            .send(BackendCommand::FetchFlights(ticket(1, Direction::Departure)))
            .expect("queue departure");
        cmd_tx
            .send(BackendCommand::FetchFlights(ticket(2, Direction::Arrival)))
            .expect("queue arrival");
        drop(cmd_tx);

        serve_commands(&runtime, &cmd_rx, &ui_tx, Arc::new(ScriptedSource));

        let mut loaded = None;
        let mut failed = None;
        for _ in 0..2 {
            match ui_rx.recv_timeout(Duration::from_secs(5)).expect("ui event") {
                UiEvent::FlightsLoaded {
                    generation,
                    records,
                } => loaded = Some((generation, records.len())),
                UiEvent::FetchFailed {
                    generation,
                    failure,
                } => failed = Some((generation, failure.kind)),
                _ => panic!("unexpected ui event"),
            }
        }

        assert_eq!(loaded, Some((1, 1)));
        assert_eq!(failed, Some((2, FetchFailureKind::MalformedResponse)));
    }
}
