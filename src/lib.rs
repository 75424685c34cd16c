//! Library side of otd: fetch, extract, cache and render Wikipedia's
//! "On this day" page.
//!
//! The entry point for callers is [`today::Today::get_record`]:
//!
//! ```no_run
//! use otd_cli::cache::DailyCache;
//! use otd_cli::scrapers::wikipedia::{FetchConfig, WikipediaFetcher};
//! use otd_cli::today::Today;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = WikipediaFetcher::new(&FetchConfig::default())?;
//! let record = Today::new(fetcher, DailyCache::user()).get_record().await?;
//! println!("{}: {} events", record.date, record.events.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod today;
pub mod utils;
