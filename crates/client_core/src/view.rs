//! View state snapshot and the reducer that moves it between snapshots.

use chrono::NaiveDate;
use shared::domain::{Direction, SortDirection, SortField};

use crate::{pipeline::SortMode, FetchQuery};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub direction: Direction,
    pub search: String,
    pub date: Option<NaiveDate>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub sort_mode: SortMode,
    /// 1-indexed.
    pub current_page: usize,
    pub items_per_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            direction: Direction::Departure,
            search: String::new(),
            date: None,
            sort_field: SortField::FlightNumber,
            sort_direction: SortDirection::Asc,
            sort_mode: SortMode::Lexicographic,
            current_page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl ViewState {
    pub fn with_items_per_page(items_per_page: usize) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            ..Self::default()
        }
    }

    pub fn fetch_query(&self) -> FetchQuery {
        FetchQuery {
            direction: self.direction,
            date: self.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SetDirection(Direction),
    SetSearch(String),
    SetDate(Option<NaiveDate>),
    /// A click on a column header.
    SortBy(SortField),
    SetSortMode(SortMode),
    GoToPage(usize),
    NextPage,
    PrevPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ViewState,
    /// Set only when the direction or date actually changed.
    pub fetch: Option<FetchQuery>,
}

impl Transition {
    fn unchanged(state: &ViewState) -> Self {
        Self {
            state: state.clone(),
            fetch: None,
        }
    }

    fn local(state: ViewState) -> Self {
        Self { state, fetch: None }
    }

    fn refetch(state: ViewState) -> Self {
        let fetch = Some(state.fetch_query());
        Self { state, fetch }
    }
}

/// `total_pages` is the page count of the current derivation and bounds page
/// navigation.
pub fn reduce(state: &ViewState, action: ViewAction, total_pages: usize) -> Transition {
    let total_pages = total_pages.max(1);

    match action {
        ViewAction::SetDirection(direction) if direction != state.direction => {
            Transition::refetch(ViewState {
                direction,
                current_page: 1,
                ..state.clone()
            })
        }
        ViewAction::SetDate(date) if date != state.date => Transition::refetch(ViewState {
            date,
            current_page: 1,
            ..state.clone()
        }),
        ViewAction::SetSearch(search) if search != state.search => Transition::local(ViewState {
            search,
            current_page: 1,
            ..state.clone()
        }),
        ViewAction::SortBy(field) => Transition::local(ViewState {
            sort_field: field,
            sort_direction: if state.sort_field == field {
                state.sort_direction.toggled()
            } else {
                SortDirection::Asc
            },
            ..state.clone()
        }),
        ViewAction::SetSortMode(sort_mode) => Transition::local(ViewState {
            sort_mode,
            ..state.clone()
        }),
        ViewAction::GoToPage(page) => Transition::local(ViewState {
            current_page: page.clamp(1, total_pages),
            ..state.clone()
        }),
        ViewAction::NextPage if state.current_page < total_pages => {
            Transition::local(ViewState {
                current_page: state.current_page + 1,
                ..state.clone()
            })
        }
        ViewAction::PrevPage if state.current_page > 1 => Transition::local(ViewState {
            current_page: (state.current_page - 1).min(total_pages),
            ..state.clone()
        }),
        ViewAction::SetDirection(_)
        | ViewAction::SetDate(_)
        | ViewAction::SetSearch(_)
        | ViewAction::NextPage
        | ViewAction::PrevPage => Transition::unchanged(state),
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
