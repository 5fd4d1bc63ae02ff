// src/sync/cache.rs
//! Incremental sync cache: per-page last-edited timestamps and output paths.
//!
//! The cache file is JSON: `{"pages": {"<id>": {"last_edited", "output_path"}}}`.
//! A missing file yields an empty cache; an unparseable file is a fatal
//! error, so corruption never silently degrades into a full re-render of
//! nothing.

use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// What we remember about one generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub last_edited: String,
    pub output_path: String,
}

/// The persisted sync cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncCache {
    #[serde(default)]
    pub pages: BTreeMap<String, CacheEntry>,
}

impl SyncCache {
    /// Loads the cache from disk. An empty path or a missing file yields an
    /// empty cache; a file that exists but does not parse is a fatal error.
    pub fn load(path: &str) -> Result<Self, AppError> {
        if path.is_empty() {
            return Ok(Self::default());
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(error) => return Err(error.into()),
        };
        serde_json::from_str(&content).map_err(|source| AppError::JsonParseError {
            path: path.into(),
            source,
        })
    }

    /// Persists the cache with stable, indented formatting. A no-op when the
    /// path is empty.
    pub fn save(&self, path: &str) -> Result<(), AppError> {
        if path.is_empty() {
            return Ok(());
        }
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        Ok(())
    }
}

/// Canonical timestamp string for cache storage and comparison.
///
/// Always UTC with fixed nine-digit nanoseconds, so equal instants always
/// produce byte-equal strings and comparison can stay string equality.
pub fn cache_timestamp(edited: &DateTime<Utc>) -> String {
    edited.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
