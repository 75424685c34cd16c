//! # otd
//!
//! Shows what happened on this day in history: the date, a handful of
//! historical events and notable birthdays, scraped from Wikipedia's
//! "On this day" page.
//!
//! ## Usage
//!
//! ```sh
//! otd              # interactive, scrollable view
//! otd --headless   # print once and exit
//! ```
//!
//! ## Architecture
//!
//! 1. **Cache**: a record fetched earlier today is reused as-is
//! 2. **Fetching**: one GET of the page, identified by a `User-Agent`
//! 3. **Extraction**: heuristic rules pull out date, events and birthdays
//! 4. **Output**: plain text, or a ratatui view fed by the pipeline task

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use otd_cli::cli::Cli;
use otd_cli::outputs::{text::render_headless, tui};
use otd_cli::scrapers::wikipedia::WikipediaFetcher;
use otd_cli::today::Today;
use otd_cli::utils::terminal_width;

#[tokio::main]
async fn main() {
    // Values already in the environment win over .env.
    dotenv::dotenv().ok();
    let args = Cli::parse();
    init_tracing(&args);
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = run(args).await {
        error!(error = %e, "Run failed");
        eprintln!("Alas, there's been an error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. The interactive view owns the screen, so it stays silent
/// unless `RUST_LOG` asks otherwise.
fn init_tracing(args: &Cli) {
    let default = if args.headless { "warn" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let fetcher = WikipediaFetcher::new(&args.fetch_config())?;
    let today = Today::new(fetcher, args.daily_cache());

    if args.headless {
        let record = today.get_record().await?;
        let width = terminal_width();
        info!(width, "Rendering headless output");
        println!("{}", render_headless(&record, width));
        return Ok(());
    }

    tui::run(today).await
}
