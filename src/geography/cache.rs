//! On-disk copy of the last downloaded boundary dataset.
//!
//! Entries remember the URL they were fetched from; a lookup for a different
//! URL under the same key is treated as a miss so a changed source never
//! serves stale outlines.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDataset {
    pub source: String,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of looking a dataset up on disk
#[derive(Debug)]
pub enum CacheLookup {
    Fresh(CachedDataset),
    Expired { fetched_at: DateTime<Utc> },
    SourceMismatch { stored: String },
    Missing,
}

pub struct GeographyCache {
    dir: PathBuf,
    max_age: Duration,
}

impl GeographyCache {
    /// Cache under the platform cache directory, e.g. `~/.cache/portfolio-globe/geography/` on Linux.
    pub fn new(expiration_days: i64) -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "portfolio-globe")
            .context("geography cache: no home directory")?;
        Self::new_in_dir(dirs.cache_dir().join("geography"), expiration_days)
    }

    pub fn new_in_dir(dir: PathBuf, expiration_days: i64) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("geography cache: creating {}", dir.display()))?;
        Ok(Self {
            dir,
            max_age: Duration::days(expiration_days),
        })
    }

    /// Look up `key`, accepting only an entry fetched from `source` within the expiry window.
    pub fn lookup(&self, key: &str, source: &str) -> Result<CacheLookup> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(CacheLookup::Missing);
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("geography cache: reading {}", path.display()))?;
        let entry: CachedDataset = serde_json::from_str(&raw)
            .with_context(|| format!("geography cache: decoding {}", path.display()))?;

        if entry.source != source {
            return Ok(CacheLookup::SourceMismatch {
                stored: entry.source,
            });
        }
        if !self.is_fresh(entry.fetched_at) {
            return Ok(CacheLookup::Expired {
                fetched_at: entry.fetched_at,
            });
        }
        Ok(CacheLookup::Fresh(entry))
    }

    pub fn store(&self, key: &str, entry: &CachedDataset) -> Result<()> {
        let path = self.entry_path(key);
        fs::write(&path, serde_json::to_string(entry)?)
            .with_context(|| format!("geography cache: writing {}", path.display()))
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>) -> bool {
        Utc::now().signed_duration_since(fetched_at) < self.max_age
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}
