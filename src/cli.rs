//! Command-line interface definitions for otd.
//!
//! Every option can also come from the environment (or a `.env` file in the
//! working directory, loaded before parsing).

use crate::cache::DailyCache;
use crate::scrapers::wikipedia::{
    DEFAULT_CONTACT_EMAIL, DEFAULT_ORIGIN_URL, DEFAULT_TIMEOUT_SECS, FetchConfig,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Show what happened on this day in history.
///
/// # Examples
///
/// ```sh
/// # Interactive, scrollable view
/// otd
///
/// # Print once and exit
/// otd --headless
///
/// # Identify yourself to Wikipedia
/// OTD_CONTACT_EMAIL=me@example.org otd --headless
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Print output and exit (no TUI)
    #[arg(long)]
    pub headless: bool,

    /// Project URL advertised in the User-Agent header
    #[arg(long, env = "OTD_ORIGIN_URL", default_value = DEFAULT_ORIGIN_URL)]
    pub origin_url: String,

    /// Contact email advertised in the User-Agent header
    #[arg(long, env = "OTD_CONTACT_EMAIL", default_value = DEFAULT_CONTACT_EMAIL)]
    pub contact_email: String,

    /// Timeout for the page request, in seconds
    #[arg(long, env = "OTD_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Directory for the daily cache (defaults to the user cache directory)
    #[arg(long, env = "OTD_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always fetch; neither read nor write the cache
    #[arg(long)]
    pub no_cache: bool,
}

impl Cli {
    /// Fetcher settings; the page URL itself is fixed.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            origin_url: self.origin_url.clone(),
            contact_email: self.contact_email.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..FetchConfig::default()
        }
    }

    pub fn daily_cache(&self) -> DailyCache {
        match (&self.cache_dir, self.no_cache) {
            (_, true) => DailyCache::disabled(),
            (Some(dir), false) => DailyCache::in_dir(dir),
            (None, false) => DailyCache::user(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "otd",
            "--headless",
            "--origin-url",
            "https://example.org/otd",
            "--contact-email",
            "me@example.org",
            "--timeout-secs",
            "5",
        ]);

        assert!(cli.headless);
        let config = cli.fetch_config();
        assert_eq!(config.origin_url, "https://example.org/otd");
        assert_eq!(config.contact_email, "me@example.org");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.url.as_str(), crate::scrapers::wikipedia::TODAY_URL);
    }

    #[test]
    fn test_cache_selection() {
        let cli = Cli::parse_from(["otd", "--no-cache", "--cache-dir", "/tmp/otd"]);
        assert!(!cli.daily_cache().is_enabled());

        let cli = Cli::parse_from(["otd", "--cache-dir", "/tmp/otd"]);
        assert!(cli.daily_cache().is_enabled());
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/otd")));
    }

    #[test]
    fn test_env_fallback_and_defaults() {
        // Only this test touches the OTD_* variables.
        unsafe {
            std::env::set_var("OTD_CONTACT_EMAIL", "env@example.org");
            std::env::remove_var("OTD_ORIGIN_URL");
        }

        let cli = Cli::parse_from(["otd"]);
        unsafe {
            std::env::remove_var("OTD_CONTACT_EMAIL");
        }

        let ua = cli.fetch_config().user_agent();
        assert!(ua.contains("env@example.org"), "user agent was {ua}");
        assert!(ua.contains(DEFAULT_ORIGIN_URL), "user agent was {ua}");
        assert!(!cli.headless);
    }

    #[test]
    fn test_dotenv_does_not_override_process_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "OTD_DOTENV_PRESET=from_file\nOTD_DOTENV_FRESH=from_file\n",
        )
        .unwrap();

        unsafe {
            std::env::set_var("OTD_DOTENV_PRESET", "from_process");
            std::env::remove_var("OTD_DOTENV_FRESH");
        }
        dotenv::from_path(&path).unwrap();

        assert_eq!(std::env::var("OTD_DOTENV_PRESET").unwrap(), "from_process");
        assert_eq!(std::env::var("OTD_DOTENV_FRESH").unwrap(), "from_file");
    }
}
