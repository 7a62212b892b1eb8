use chrono::{Local, NaiveDate};
use client_core::{pipeline::SortMode, view::ViewAction};
use crossbeam_channel::Receiver;
use egui_extras::{Column, DatePickerButton, TableBuilder};
use shared::{
    domain::{Direction, SortField},
    protocol::display_time,
};

use crate::controller::{events::UiEvent, reducer::Controller};

const ROW_HEIGHT: f32 = 24.0;
const HEADER_HEIGHT: f32 = 28.0;

pub struct FlightBoardApp {
    controller: Controller,
    ui_rx: Receiver<UiEvent>,

    search_input: String,
    // The picker needs a concrete date even while no date filter is applied.
    date_input: NaiveDate,

    started: bool,
}

impl FlightBoardApp {
    pub fn new(controller: Controller, ui_rx: Receiver<UiEvent>) -> Self {
        let search_input = controller.board().view_state().search.clone();
        let date_input = controller
            .board()
            .view_state()
            .date
            .unwrap_or_else(|| Local::now().date_naive());
        Self {
            controller,
            ui_rx,
            search_input,
            date_input,
            started: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.controller.handle_event(event);
        }
    }

    fn show_filters(&mut self, ui: &mut egui::Ui, actions: &mut Vec<ViewAction>) {
        let state = self.controller.board().view_state();
        let direction = state.direction;
        let date = state.date;
        let mut natural_order = state.sort_mode == SortMode::Typed;

        ui.horizontal_wrapped(|ui| {
            for candidate in [Direction::Departure, Direction::Arrival] {
                if ui
                    .selectable_label(direction == candidate, candidate.label())
                    .clicked()
                {
                    actions.push(ViewAction::SetDirection(candidate));
                }
            }

            ui.separator();

            let search = egui::TextEdit::singleline(&mut self.search_input)
                .hint_text("Flight number")
                .desired_width(140.0);
            if ui.add(search).changed() {
                actions.push(ViewAction::SetSearch(self.search_input.clone()));
            }

            ui.separator();

            if ui.add(DatePickerButton::new(&mut self.date_input)).changed() {
                actions.push(ViewAction::SetDate(Some(self.date_input)));
            }
            match date {
                Some(_) => {
                    if ui.small_button("Any date").clicked() {
                        actions.push(ViewAction::SetDate(None));
                    }
                }
                None => {
                    ui.weak("any date");
                }
            }

            ui.separator();

            if ui
                .checkbox(&mut natural_order, "Natural order")
                .on_hover_text("Sort flight numbers numerically and times chronologically")
                .changed()
            {
                actions.push(ViewAction::SetSortMode(if natural_order {
                    SortMode::Typed
                } else {
                    SortMode::Lexicographic
                }));
            }

            if self.controller.board().is_loading() {
                ui.spinner();
            }
        });
    }

    fn show_table(&self, ui: &mut egui::Ui, actions: &mut Vec<ViewAction>) {
        let board = self.controller.board();
        let state = board.view_state();
        let page = board.page_view();

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(90.0))
            .column(Column::remainder().at_least(140.0))
            .column(Column::remainder().at_least(120.0))
            .column(Column::auto().at_least(150.0))
            .header(HEADER_HEIGHT, |mut header| {
                for field in SortField::ALL {
                    header.col(|ui| {
                        let arrow = if state.sort_field == field {
                            state.sort_direction.arrow()
                        } else {
                            ""
                        };
                        let text = egui::RichText::new(format!("{} {arrow}", field.label())).strong();
                        if ui.add(egui::Button::new(text).frame(false)).clicked() {
                            actions.push(ViewAction::SortBy(field));
                        }
                    });
                }
            })
            .body(|mut body| {
                if page.rows.is_empty() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(board.empty_message());
                        });
                        for _ in 1..SortField::ALL.len() {
                            row.col(|_| {});
                        }
                    });
                    return;
                }

                for record in &page.rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.monospace(&record.flight_number);
                        });
                        row.col(|ui| {
                            ui.label(&record.airline);
                        });
                        row.col(|ui| {
                            ui.label(&record.city);
                        });
                        row.col(|ui| {
                            ui.label(display_time(&record.time));
                        });
                    });
                }
            });
    }

    fn show_pagination(&self, ui: &mut egui::Ui, actions: &mut Vec<ViewAction>) {
        let page = self.controller.board().page_view();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(page.has_prev(), egui::Button::new("◀ Back"))
                .clicked()
            {
                actions.push(ViewAction::PrevPage);
            }
            ui.label("Page");
            let mut target = page.current_page;
            let jump = ui.add_enabled(
                page.total_pages > 1,
                egui::DragValue::new(&mut target).range(1..=page.total_pages),
            );
            if jump.changed() && target != page.current_page {
                actions.push(ViewAction::GoToPage(target));
            }
            ui.label(format!("of {}", page.total_pages));
            if ui
                .add_enabled(page.has_next(), egui::Button::new("Next ▶"))
                .clicked()
            {
                actions.push(ViewAction::NextPage);
            }
            ui.weak(format!("{} flights", page.total_matches));
        });
    }

    fn show_status(&mut self, ui: &mut egui::Ui) {
        let mut dismiss = false;
        if let Some(banner) = self.controller.banner() {
            ui.horizontal(|ui| {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("{}: {}", banner.label(), banner.message()),
                );
                dismiss = ui.small_button("✕").clicked();
            });
        }
        if dismiss {
            self.controller.dismiss_banner();
        }
        ui.weak(self.controller.status());
    }
}

impl eframe::App for FlightBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.started {
            self.started = true;
            self.controller.start();
        }
        self.process_ui_events();

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("filters")
            .frame(
                egui::Frame::new()
                    .fill(ctx.style().visuals.panel_fill)
                    .inner_margin(egui::Margin::symmetric(8, 6)),
            )
            .show(ctx, |ui| self.show_filters(ui, &mut actions));

        egui::TopBottomPanel::bottom("pagination")
            .frame(
                egui::Frame::new()
                    .fill(ctx.style().visuals.panel_fill)
                    .inner_margin(egui::Margin::symmetric(8, 6)),
            )
            .show(ctx, |ui| {
                self.show_pagination(ui, &mut actions);
                self.show_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| self.show_table(ui, &mut actions));

        for action in actions {
            self.controller.apply(action);
        }

        if self.controller.board().is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
