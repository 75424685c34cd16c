//! Heuristic extraction of a [`Record`] from the "On this day" page.
//!
//! The page has no stable schema, so extraction is three independent rules
//! over CSS selectors, all scoped to the main content region
//! (`.mw-parser-output`):
//!
//! | Rule | Selector | Tie-break |
//! |------|----------|-----------|
//! | date | `p b a` | first link not starting with `Wikipedia:` |
//! | events | `ul` → `li` | first list in the region only |
//! | birthdays | `.hlist ul li` | year info from the *last* `(` |
//!
//! None of the rules fail. Missing structure yields the default date label
//! or an empty collection, so a layout change degrades one field instead of
//! the whole record.

use crate::models::{Birthday, DEFAULT_DATE_LABEL, Event, Record};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

static DATE_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".mw-parser-output p b a").unwrap());
static CONTENT_LISTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".mw-parser-output ul").unwrap());
static LIST_ITEMS: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static HLIST_ITEMS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".mw-parser-output .hlist ul li").unwrap());
static BOLD: Lazy<Selector> = Lazy::new(|| Selector::parse("b").unwrap());

/// Bold links with this prefix point at project pages, not at the date.
const META_LINK_PREFIX: &str = "Wikipedia:";

/// Preferred year/description separator.
const EN_DASH: char = '–';
/// Fallback separator when a line has no en-dash.
const HYPHEN: char = '-';

/// Only items carrying one of these markers are births or deaths.
const LIFE_MARKERS: [&str; 2] = ["(b.", "(d."];

/// Parse `html` and run every rule. Never fails.
#[instrument(level = "info", skip_all, fields(bytes = html.len()))]
pub fn extract(html: &str) -> Record {
    let document = Html::parse_document(html);

    let record = Record {
        date: extract_date(&document),
        events: extract_events(&document),
        birthdays: extract_birthdays(&document),
    };

    info!(
        date = %record.date,
        events = record.events.len(),
        birthdays = record.birthdays.len(),
        "Extracted record"
    );
    record
}

/// Date rule: first bold paragraph link whose text is not a `Wikipedia:` link.
pub fn extract_date(document: &Html) -> String {
    let first_non_meta = document
        .select(&DATE_LINKS)
        .map(element_text)
        .find(|text| !text.starts_with(META_LINK_PREFIX));

    match first_non_meta {
        Some(date) if !date.is_empty() => date,
        _ => {
            debug!("No date link found; using default label");
            DEFAULT_DATE_LABEL.to_string()
        }
    }
}

/// Events rule: every item of the first list in the content region.
pub fn extract_events(document: &Html) -> Vec<Event> {
    let Some(first_list) = document.select(&CONTENT_LISTS).next() else {
        debug!("No list in content region; no events");
        return Vec::new();
    };

    first_list
        .select(&LIST_ITEMS)
        .filter_map(|item| parse_event(&element_text(item)))
        .collect()
}

/// Split one event line into year and description.
///
/// Splits at the first en-dash, else at the first hyphen, so later dashes stay
/// in the description. A line with neither keeps its whole trimmed text with
/// an empty year; a blank line yields `None`.
pub fn parse_event(line: &str) -> Option<Event> {
    let split = line
        .split_once(EN_DASH)
        .or_else(|| line.split_once(HYPHEN));

    match split {
        Some((year, text)) => Some(Event {
            year: year.trim().to_string(),
            text: text.trim().to_string(),
        }),
        None => {
            let text = line.trim();
            if text.is_empty() {
                None
            } else {
                Some(Event {
                    year: String::new(),
                    text: text.to_string(),
                })
            }
        }
    }
}

/// Birthdays rule: horizontal-list items marked as a birth or death.
pub fn extract_birthdays(document: &Html) -> Vec<Birthday> {
    document
        .select(&HLIST_ITEMS)
        .filter_map(|item| {
            let text = element_text(item);
            if !LIFE_MARKERS.iter().any(|marker| text.contains(marker)) {
                return None;
            }
            let bold = item.select(&BOLD).next().map(element_text);
            Some(parse_birthday(&text, bold))
        })
        .collect()
}

/// Build a [`Birthday`] from an item's full text and its first bold text.
///
/// The name is the bold text; without one it falls back to the text before
/// the first `(`, or the whole item when there is none.
pub fn parse_birthday(text: &str, bold: Option<String>) -> Birthday {
    let name = match bold {
        Some(name) if !name.is_empty() => name,
        _ => match text.find('(') {
            Some(idx) => text[..idx].trim().to_string(),
            None => text.to_string(),
        },
    };

    Birthday {
        name,
        year_info: last_parenthetical(text),
    }
}

/// Text from the last `(` to the end, minus one enclosing pair of parens.
fn last_parenthetical(text: &str) -> String {
    let Some(idx) = text.rfind('(') else {
        return String::new();
    };
    let tail = &text[idx..];
    let tail = tail.strip_prefix('(').unwrap_or(tail);
    tail.strip_suffix(')').unwrap_or(tail).to_string()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
