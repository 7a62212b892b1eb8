use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use client_core::{view::ViewState, FlightBoard};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime::spawn_backend_thread};
use controller::{events::UiEvent, reducer::Controller};
use ui::FlightBoardApp;

#[derive(Parser, Debug)]
#[command(about = "Airport departures and arrivals board")]
struct Args {
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides the timetable endpoint from config and environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    page_size: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = config::load_settings(&args.config);
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(page_size) = args.page_size.filter(|size| *size > 0) {
        settings.page_size = page_size;
    }
    let client_config = settings.client_config()?;
    tracing::info!(
        endpoint = %client_config.base_url,
        page_size = settings.page_size,
        "starting flight board"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    spawn_backend_thread(cmd_rx, ui_tx, client_config);

    let board = FlightBoard::new(ViewState::with_items_per_page(settings.page_size));
    let controller = Controller::new(board, cmd_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Flight Board")
            .with_inner_size([960.0, 600.0])
            .with_min_inner_size([720.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Flight Board",
        options,
        Box::new(|_cc| Ok(Box::new(FlightBoardApp::new(controller, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
    .context("flight board window failed")
}
