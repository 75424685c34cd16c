//! Data models for the "On this day" record and its cache envelope.
//!
//! - [`Record`]: everything extracted from one fetch of the page
//! - [`Event`], [`Birthday`]: the two list kinds the page publishes
//! - [`CacheEntry`]: a record stamped with the calendar day it was fetched on
//!
//! The serialized field names are PascalCase (`Date`, `Events`, `Year`, ...)
//! so the cache file keeps the same shape across writes and reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date label used when the page has no recognisable date link.
pub const DEFAULT_DATE_LABEL: &str = "Today";

/// A historical event line, e.g. `1879 – Albert Einstein is born`.
///
/// `year` is empty when the line had no separator to split on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    pub year: String,
    pub text: String,
}

/// A notable birth or death listed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Birthday {
    #[serde(rename = "Name")]
    pub name: String,
    /// Free text from the item's last parenthetical, e.g. `b. 1950` or
    /// `b. 1920, d. 1990`. Not a number.
    #[serde(rename = "Year")]
    pub year_info: String,
}

/// The structured result of one extraction.
///
/// `date` is a human-readable label ("March 14"), not a normalized calendar
/// date. Both collections keep document order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub date: String,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub birthdays: Vec<Birthday>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            date: DEFAULT_DATE_LABEL.to_string(),
            events: Vec::new(),
            birthdays: Vec::new(),
        }
    }
}

/// What actually lands in the cache file.
///
/// Only valid for reuse while `cached_on` is the current local date.
#[derive(Debug, Deserialize, Serialize)]
pub struct CacheEntry {
    #[serde(rename = "Date", with = "day_format")]
    pub cached_on: NaiveDate,
    #[serde(rename = "Data")]
    pub record: Record,
}

/// `YYYY-MM-DD` (de)serialization for the cache day key.
pub mod day_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&day.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(de::Error::custom)
    }
}
