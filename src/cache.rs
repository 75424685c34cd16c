//! Single-slot, per-day cache of the extracted [`Record`].
//!
//! The record is stored as `today.json` in the per-user cache directory
//! (`~/.cache/otd-cli` on Linux):
//!
//! ```text
//! {"Date":"2025-03-14","Data":{"Date":"March 14","Events":[...],"Birthdays":[...]}}
//! ```
//!
//! The cache is advisory. Reads that fail for any reason are misses, writes
//! that fail are logged and dropped, and nothing here ever returns an error
//! to the caller. Concurrent processes may both write; the last one wins.

use crate::models::{CacheEntry, Record};
use crate::utils::local_today;
use chrono::NaiveDate;
use directories::BaseDirs;
use std::io;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Directory name under the user's cache root.
pub const APP_DIR: &str = "otd-cli";
/// The one file the cache ever writes.
pub const CACHE_FILE: &str = "today.json";

#[derive(Debug, Clone)]
enum Location {
    /// Platform cache directory for the current user.
    UserCacheDir,
    /// Explicit directory, e.g. from `--cache-dir`.
    Dir(PathBuf),
    /// `--no-cache`: every read misses, every write is skipped.
    Disabled,
}

/// Best-effort cache keyed implicitly by the local calendar day.
#[derive(Debug, Clone)]
pub struct DailyCache {
    location: Location,
}

impl DailyCache {
    /// Cache in the platform's per-user cache directory.
    pub fn user() -> Self {
        Self {
            location: Location::UserCacheDir,
        }
    }

    /// Cache in an explicit directory (created on first use).
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::Dir(dir.into()),
        }
    }

    /// A cache that never hits and never writes.
    pub fn disabled() -> Self {
        Self {
            location: Location::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.location, Location::Disabled)
    }

    /// Cached record for today, if one exists and is readable.
    pub async fn read(&self) -> Option<Record> {
        self.read_for(local_today()).await
    }

    /// Cached record for `today`. Entries stamped with any other day miss.
    #[instrument(level = "debug", skip_all, fields(%today))]
    pub async fn read_for(&self, today: NaiveDate) -> Option<Record> {
        if !self.is_enabled() {
            debug!("Cache disabled; treating as miss");
            return None;
        }

        let path = match self.file_path().await {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Could not resolve cache directory; treating as miss");
                return None;
            }
        };

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No cache file");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed reading cache file; treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt cache file; treating as miss");
                return None;
            }
        };

        if entry.cached_on != today {
            debug!(cached_on = %entry.cached_on, "Cache entry is from another day");
            return None;
        }

        info!(path = %path.display(), "Cache hit");
        Some(entry.record)
    }

    /// Store `record` as today's entry. Never fails.
    pub async fn write(&self, record: &Record) {
        self.write_for(local_today(), record).await
    }

    /// Store `record` stamped with `day`, overwriting whatever was there.
    #[instrument(level = "debug", skip_all, fields(%day))]
    pub async fn write_for(&self, day: NaiveDate, record: &Record) {
        if !self.is_enabled() {
            debug!("Cache disabled; skipping write");
            return;
        }
        if let Err(e) = self.try_write(day, record).await {
            warn!(error = %e, "Failed writing cache; continuing without it");
        }
    }

    async fn try_write(&self, day: NaiveDate, record: &Record) -> io::Result<()> {
        let entry = CacheEntry {
            cached_on: day,
            record: record.clone(),
        };
        let json = serde_json::to_vec(&entry)?;
        let path = self.file_path().await?;
        fs::write(&path, json).await?;
        info!(path = %path.display(), "Wrote cache file");
        Ok(())
    }

    /// Resolve `<dir>/today.json`, creating `<dir>` if needed.
    async fn file_path(&self) -> io::Result<PathBuf> {
        let dir = match &self.location {
            Location::Dir(dir) => dir.clone(),
            Location::UserCacheDir => user_cache_dir()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?,
            Location::Disabled => {
                return Err(io::Error::new(io::ErrorKind::Unsupported, "cache disabled"));
            }
        };
        fs::create_dir_all(&dir).await?;
        Ok(dir.join(CACHE_FILE))
    }
}

/// `<user cache root>/otd-cli`, e.g. `~/.cache/otd-cli` on Linux.
fn user_cache_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.cache_dir().join(APP_DIR))
}
