//! The one operation the rest of the program calls: "get today's record".
//!
//! Pipeline:
//! 1. **Cache**: a same-day hit returns immediately, no network
//! 2. **Fetch**: one GET; any error is returned unchanged
//! 3. **Extract**: heuristic parse, never fails
//! 4. **Store**: best-effort cache write
//!
//! Two processes racing on a miss both fetch and both write. Their records
//! are interchangeable for the day, so there is no locking.

use crate::cache::DailyCache;
use crate::models::Record;
use crate::scrapers::extract::extract;
use crate::scrapers::{FetchError, PageSource};
use crate::utils::local_today;
use chrono::NaiveDate;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Cache-fronted access to the page.
#[derive(Debug)]
pub struct Today<S> {
    source: S,
    cache: DailyCache,
}

impl<S: PageSource> Today<S> {
    /// Pair a page source with the cache that fronts it.
    ///
    /// # Arguments
    ///
    /// * `source` - Where the page HTML comes from on a cache miss
    /// * `cache` - The daily cache; [`DailyCache::disabled`] fetches every time
    pub fn new(source: S, cache: DailyCache) -> Self {
        Self { source, cache }
    }

    /// Today's record, from the cache when possible.
    ///
    /// "Today" is the local calendar day. A cache entry stamped with that
    /// day is returned without touching the network; otherwise the page is
    /// fetched, extracted and stored for later calls.
    ///
    /// # Returns
    ///
    /// The [`Record`] for today. Extraction never fails, so a page with
    /// unexpected markup yields a record with defaults or empty lists.
    ///
    /// # Errors
    ///
    /// Any [`FetchError`] from the source, unchanged. Nothing is cached then.
    pub async fn get_record(&self) -> Result<Record, FetchError> {
        self.get_record_for(local_today()).await
    }

    /// Same as [`get_record`](Self::get_record) with an explicit calendar day.
    ///
    /// # Arguments
    ///
    /// * `day` - The day cache entries are checked against and stamped with
    #[instrument(level = "info", skip_all, fields(%day))]
    pub async fn get_record_for(&self, day: NaiveDate) -> Result<Record, FetchError> {
        if let Some(record) = self.cache.read_for(day).await {
            info!(date = %record.date, "Serving record from cache");
            return Ok(record);
        }

        let t0 = Instant::now();
        let html = match self.source.fetch().await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Fetch failed; nothing cached");
                return Err(e);
            }
        };

        let record = extract(&html);
        self.cache.write_for(day, &record).await;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            events = record.events.len(),
            birthdays = record.birthdays.len(),
            "Fetched fresh record"
        );
        Ok(record)
    }
}
