//! Result cache for listing views.
//!
//! Maps a filter signature to the last successful result set for it. Entries
//! live for one session: there is no expiry and no size bound, and the whole
//! store is dropped on reset.

use serde::{Deserialize, Serialize};
use shared::{Media, MediaSort, Season};
use std::collections::HashMap;
use tracing::debug;

/// Filter signature for a (search, sort, season) triple
///
/// Order- and case-sensitive. Sort and season names never contain `-`, so the
/// key splits back into its parts from the right.
pub fn cache_key(search_query: &str, sort: MediaSort, season: Option<Season>) -> String {
    format!(
        "{}-{}-{}",
        search_query,
        sort,
        season.map(|s| s.as_str()).unwrap_or_default()
    )
}

/// Cached result set for one filter signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub items: Vec<Media>,
    pub page: u32,
    pub has_more: bool,
    #[serde(default)]
    pub total: u32,
}

/// In-memory result cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached entry if it exists
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        let entry = self.entries.get(key);
        if entry.is_some() {
            debug!(key = key, "Cache hit");
        } else {
            debug!(key = key, "Cache miss");
        }
        entry
    }

    /// Store an entry, replacing whatever was there
    pub fn put(&mut self, key: impl Into<String>, entry: CacheEntry) {
        let key = key.into();
        debug!(key = %key, items = entry.items.len(), page = entry.page, "Cache stored");
        self.entries.insert(key, entry);
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
