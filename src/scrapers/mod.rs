//! Fetching and parsing the Wikipedia "On this day" page.
//!
//! Scraping is split into two phases, each in its own submodule:
//!
//! 1. **Fetching** ([`wikipedia`]): one GET against the page, returning raw HTML
//! 2. **Extraction** ([`extract`]): heuristic rules turning that HTML into a
//!    [`Record`](crate::models::Record)
//!
//! Fetching sits behind the [`PageSource`] trait so the pipeline in
//! [`crate::today`] can run against canned markup.

use std::future::Future;
use thiserror::Error;

pub mod extract;
pub mod wikipedia;

/// Errors surfaced by a page fetch.
///
/// These are the only failures that reach the caller of
/// [`Today::get_record`](crate::today::Today::get_record).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The exchange did not complete (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("status code error: {code} {reason}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Canonical reason phrase, if the code has one
        reason: String,
    },
}

/// Something that can produce the raw markup of the page.
pub trait PageSource {
    /// Fetch the page once. No retries.
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}
