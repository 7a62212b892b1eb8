//! Pure filter → sort → paginate stages over a fetched record snapshot.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{FlightRecord, SortDirection, SortField},
    protocol::parse_timestamp,
};

use crate::view::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Every column compared as text.
    #[default]
    Lexicographic,
    /// Per-column comparators: natural flight numbers, chronological times.
    Typed,
}

pub type Comparator = fn(&str, &str) -> Ordering;

const TYPED_COMPARATORS: [(SortField, Comparator); 4] = [
    (SortField::FlightNumber, flight_number_cmp),
    (SortField::Airline, locale_cmp),
    (SortField::City, locale_cmp),
    (SortField::Time, timestamp_cmp),
];

pub fn comparator_for(field: SortField, mode: SortMode) -> Comparator {
    match mode {
        SortMode::Lexicographic => locale_cmp,
        SortMode::Typed => TYPED_COMPARATORS
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, comparator)| *comparator)
            .unwrap_or(locale_cmp),
    }
}

thread_local! {
    // Root collation at tertiary strength: letters before case, lowercase
    // first, `ё` next to `е`.
    static COLLATOR: Option<Collator> =
        match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(err) => {
                tracing::warn!("unicode collation unavailable, sorting by lowercase text: {err}");
                None
            }
        };
}

/// Locale-aware text order (Unicode collation), with a code-point tiebreak so
/// only identical strings compare equal.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
        })
        .then_with(|| a.cmp(b))
}

/// Splits `"SU 1402"` into `("SU", Some(1402))`.
fn split_flight_number(raw: &str) -> (&str, Option<u64>) {
    let Some(digits_start) = raw.find(|c: char| c.is_ascii_digit()) else {
        return (raw.trim(), None);
    };
    let digits_end = raw[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |offset| digits_start + offset);
    let number = raw[digits_start..digits_end].parse().ok();
    (raw[..digits_start].trim(), number)
}

pub fn flight_number_cmp(a: &str, b: &str) -> Ordering {
    let (a_prefix, a_number) = split_flight_number(a);
    let (b_prefix, b_number) = split_flight_number(b);
    locale_cmp(a_prefix, b_prefix)
        .then_with(|| (a_number.is_none(), a_number).cmp(&(b_number.is_none(), b_number)))
        .then_with(|| locale_cmp(a, b))
}

/// Chronological order; values that do not parse sort after all that do.
pub fn timestamp_cmp(a: &str, b: &str) -> Ordering {
    let a_time = parse_timestamp(a);
    let b_time = parse_timestamp(b);
    (a_time.is_none(), a_time)
        .cmp(&(b_time.is_none(), b_time))
        .then_with(|| locale_cmp(a, b))
}

pub fn filter<'a>(records: &'a [FlightRecord], search: &str) -> Vec<&'a FlightRecord> {
    if search.is_empty() {
        return records.iter().collect();
    }
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| record.flight_number.to_lowercase().contains(&needle))
        .collect()
}

pub fn sort<'a>(
    records: Vec<&'a FlightRecord>,
    field: SortField,
    direction: SortDirection,
) -> Vec<&'a FlightRecord> {
    sort_with(records, field, direction, SortMode::Lexicographic)
}

/// Stable sort; `Desc` negates the comparator so ties keep their input order.
pub fn sort_with<'a>(
    mut records: Vec<&'a FlightRecord>,
    field: SortField,
    direction: SortDirection,
    mode: SortMode,
) -> Vec<&'a FlightRecord> {
    let compare = comparator_for(field, mode);
    records.sort_by(|a, b| {
        let ordering = compare(field.key(a), field.key(b));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    records
}

/// The 1-indexed `page` of `records`; empty once past the end. Page 0 is
/// read as page 1.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// Never below 1, so an empty result still reads "page 1 of 1".
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub rows: Vec<&'a FlightRecord>,
    pub total_matches: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl PageView<'_> {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

pub fn run<'a>(records: &'a [FlightRecord], state: &ViewState) -> PageView<'a> {
    let matching = filter(records, &state.search);
    let ordered = sort_with(
        matching,
        state.sort_field,
        state.sort_direction,
        state.sort_mode,
    );
    let rows = paginate(&ordered, state.current_page, state.items_per_page).to_vec();

    PageView {
        rows,
        total_matches: ordered.len(),
        total_pages: total_pages(ordered.len(), state.items_per_page),
        current_page: state.current_page,
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
