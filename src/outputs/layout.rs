//! Row layout shared by the headless and interactive renderers.
//!
//! Both renderers show the same thing: a header with the date, a summary of
//! how many items are shown, then the events timeline and the birthdays
//! list. This module decides *what* goes on each row; the renderers decide
//! how it looks.

use crate::models::{Birthday, Event, Record};
use crate::utils::wrap_text;

/// At most this many events and this many birthdays are shown.
pub const MAX_ITEMS: usize = 6;

/// Columns reserved for the right-aligned year in the timeline.
pub const YEAR_WIDTH: usize = 6;

pub const TITLE: &str = "ON THIS DAY";
pub const EVENTS_HEADING: &str = "Historical Events";
pub const BIRTHDAYS_HEADING: &str = "Famous Birthdays";
pub const TIMELINE_BAR: &str = "│";
pub const BULLET: &str = "•";

/// Columns taken by the year, the bar, and margins.
const TIMELINE_GUTTER: usize = 12;
const MIN_DESCRIPTION_WIDTH: usize = 20;

/// One logical row of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row<'a> {
    Heading(&'static str),
    Blank,
    /// First line of an event, carrying its year.
    Event { year: &'a str, line: String },
    /// Wrapped continuation of the previous event's description.
    Continuation(String),
    Birthday(&'a Birthday),
}

/// The events that fit the display cap.
pub fn shown_events(record: &Record) -> &[Event] {
    &record.events[..record.events.len().min(MAX_ITEMS)]
}

/// The birthdays that fit the display cap.
pub fn shown_birthdays(record: &Record) -> &[Birthday] {
    &record.birthdays[..record.birthdays.len().min(MAX_ITEMS)]
}

/// `"6 events • 4 births"`, counting shown items only.
pub fn summary(record: &Record) -> String {
    format!(
        "{} events {} {} births",
        shown_events(record).len(),
        BULLET,
        shown_birthdays(record).len()
    )
}

/// Width available to an event description in a `width`-column display.
pub fn description_width(width: usize) -> usize {
    width.saturating_sub(TIMELINE_GUTTER).max(MIN_DESCRIPTION_WIDTH)
}

/// Body rows for `record` laid out for `width` columns.
pub fn body_rows(record: &Record, width: usize) -> Vec<Row<'_>> {
    let desc_width = description_width(width);
    let mut rows = vec![Row::Heading(EVENTS_HEADING)];

    for event in shown_events(record) {
        let mut lines = wrap_text(&event.text, desc_width).into_iter();
        let first = lines.next().unwrap_or_default();
        rows.push(Row::Event {
            year: &event.year,
            line: first,
        });
        rows.extend(lines.map(Row::Continuation));
    }

    rows.push(Row::Blank);
    rows.push(Row::Heading(BIRTHDAYS_HEADING));
    rows.extend(shown_birthdays(record).iter().map(Row::Birthday));
    rows
}
