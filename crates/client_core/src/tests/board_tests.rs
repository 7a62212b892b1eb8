use super::*;
use chrono::NaiveDate;
use shared::{
    domain::{Direction, SortField},
    error::{FetchFailureKind, MALFORMED_RESPONSE_MESSAGE, TRANSPORT_FAILURE_MESSAGE},
};

fn flight(id: &str, flight_number: &str) -> FlightRecord {
    FlightRecord {
        id: id.to_string(),
        flight_number: flight_number.to_string(),
        airline: "Aeroflot".to_string(),
        city: "Sochi".to_string(),
        time: "2024-05-01T10:55:00".to_string(),
    }
}

fn numbered_flights(count: usize) -> Vec<FlightRecord> {
    (0..count)
        .map(|i| flight(&i.to_string(), &format!("SU {:03}", i)))
        .collect()
}

#[test]
fn successful_fetch_replaces_the_snapshot() {
    let mut board = FlightBoard::default();
    let first = board.initial_fetch();
    assert!(board.apply_fetch(first.generation, Ok(numbered_flights(7))));

    let second = board
        .dispatch(ViewAction::SetDirection(Direction::Arrival))
        .expect("direction change fetches");
    assert!(board.apply_fetch(second.generation, Ok(vec![flight("x", "FV 1")])));

    assert_eq!(board.records(), &[flight("x", "FV 1")]);
    assert!(board.failure().is_none());
    assert!(!board.is_loading());
}

#[test]
fn failed_fetch_clears_records_and_surfaces_message() {
    let mut board = FlightBoard::default();
    let first = board.initial_fetch();
    board.apply_fetch(first.generation, Ok(numbered_flights(3)));

    let second = board
        .dispatch(ViewAction::SetDirection(Direction::Arrival))
        .expect("fetch");
    board.apply_fetch(
        second.generation,
        Err(FetchFailure::new(FetchFailureKind::Transport, "connection refused")),
    );

    assert!(board.records().is_empty());
    assert_eq!(board.empty_message(), TRANSPORT_FAILURE_MESSAGE);
    assert!(board.page_view().rows.is_empty());
}

#[test]
fn missing_items_leaves_an_empty_single_page_board() {
    let mut board = FlightBoard::default();
    let ticket = board.initial_fetch();

    board.apply_fetch(
        ticket.generation,
        Err(FetchFailure::new(
            FetchFailureKind::MalformedResponse,
            "no items",
        )),
    );

    let view = board.page_view();
    assert_eq!(board.empty_message(), MALFORMED_RESPONSE_MESSAGE);
    assert_eq!(view.total_matches, 0);
    assert_eq!(view.total_pages, 1);
    assert!(!view.has_prev());
    assert!(!view.has_next());
}

#[test]
fn stale_responses_are_discarded() {
    let mut board = FlightBoard::default();
    let slow = board.initial_fetch();
    let fast = board
        .dispatch(ViewAction::SetDate(NaiveDate::from_ymd_opt(2024, 5, 1)))
        .expect("date change fetches");

    assert!(board.apply_fetch(fast.generation, Ok(vec![flight("new", "SU 2")])));
    assert!(!board.apply_fetch(slow.generation, Ok(vec![flight("old", "SU 1")])));
    assert!(!board.apply_fetch(
        slow.generation,
        Err(FetchFailure::new(FetchFailureKind::Transport, "late"))
    ));

    assert_eq!(board.records(), &[flight("new", "SU 2")]);
    assert!(board.failure().is_none());
}

#[test]
fn loading_lasts_until_the_latest_ticket_resolves() {
    let mut board = FlightBoard::default();
    let first = board.initial_fetch();
    let second = board.begin_fetch(board.view_state().fetch_query());
    assert!(board.is_loading());

    board.apply_fetch(first.generation, Ok(Vec::new()));
    assert!(board.is_loading());

    board.apply_fetch(second.generation, Ok(Vec::new()));
    assert!(!board.is_loading());
    assert_eq!(board.latest_generation(), second.generation);
}

#[test]
fn empty_result_without_failure_reads_no_data() {
    let mut board = FlightBoard::default();
    let ticket = board.initial_fetch();
    board.apply_fetch(ticket.generation, Ok(Vec::new()));

    assert_eq!(board.empty_message(), NO_DATA_MESSAGE);
}

#[test]
fn paging_is_bounded_by_the_filtered_count() {
    let mut board = FlightBoard::default();
    let ticket = board.initial_fetch();
    board.apply_fetch(ticket.generation, Ok(numbered_flights(12)));
    assert_eq!(board.total_pages(), 3);

    for _ in 0..5 {
        assert!(board.dispatch(ViewAction::NextPage).is_none());
    }
    assert_eq!(board.view_state().current_page, 3);
    assert_eq!(board.page_view().rows.len(), 2);

    board.dispatch(ViewAction::SetSearch("SU 00".to_string()));
    assert_eq!(board.view_state().current_page, 1);
    assert_eq!(board.total_pages(), 2);
}

#[test]
fn page_view_reflects_sort_clicks_without_refetching() {
    let mut board = FlightBoard::default();
    let ticket = board.initial_fetch();
    board.apply_fetch(ticket.generation, Ok(numbered_flights(3)));

    assert!(board
        .dispatch(ViewAction::SortBy(SortField::FlightNumber))
        .is_none());

    let numbers: Vec<&str> = board
        .page_view()
        .rows
        .into_iter()
        .map(|r| r.flight_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["SU 002", "SU 001", "SU 000"]);
    assert_eq!(board.latest_generation(), ticket.generation);
}
