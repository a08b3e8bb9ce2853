//! Cache directory handle and freshness checks.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::hash::compute_cache_key;
use crate::{AppConfig, Error};

/// Freshness of a cache file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Present and younger than the TTL.
    Fresh,
    /// Present but at least as old as the TTL.
    Expired,
    /// No file at the path.
    Absent,
}

/// Handle to the on-disk PDF cache.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    ttl: Duration,
    enabled: bool,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration, enabled: bool) -> Self {
        Self { root: root.into(), ttl, enabled }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache_dir.clone(), config.cache_ttl(), config.cache_enabled)
    }

    /// Create the cache directory. A no-op when caching is disabled.
    pub async fn init(&self) -> Result<(), Error> {
        if self.enabled {
            tokio::fs::create_dir_all(&self.root).await?;
            tracing::debug!(root = %self.root.display(), "cache directory ready");
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stable on-disk location of the entry for `url`.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(format!("{}.pdf", compute_cache_key(url)))
    }

    /// Classify the file at `path` against the TTL.
    ///
    /// Unreadable metadata counts as absent. A modification time in the
    /// future counts as age zero.
    pub async fn status(&self, path: &Path) -> EntryStatus {
        let modified = match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return EntryStatus::Absent,
        };

        let age = SystemTime::now().duration_since(modified).unwrap_or(Duration::ZERO);
        if age >= self.ttl { EntryStatus::Expired } else { EntryStatus::Fresh }
    }

    /// Whether the entry at `path` may be served as-is.
    pub async fn is_valid(&self, path: &Path) -> bool {
        self.enabled && self.status(path).await == EntryStatus::Fresh
    }

    /// Remove a stale entry ahead of regeneration.
    ///
    /// A file that is already gone (another request got there first) is not an error.
    pub async fn evict(&self, path: &Path) -> Result<(), Error> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "evicted expired cache entry");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Cache(e)),
        }
    }
}
