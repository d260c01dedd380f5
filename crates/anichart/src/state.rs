//! Listing session state.
//!
//! Everything here is plain serde data so a server-rendered session can be
//! embedded in the response and restored on the client.

use crate::cache::{cache_key, ResultCache};
use serde::{Deserialize, Serialize};
use shared::{Media, MediaSort, Season};

/// User-selected filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_query: String,
    pub sort: MediaSort,
    pub season: Option<Season>,
}

impl FilterState {
    pub fn new(sort: MediaSort, season: Option<Season>) -> Self {
        Self {
            search_query: String::new(),
            sort,
            season,
        }
    }

    /// Signature of this filter combination in the result cache
    pub fn cache_key(&self) -> String {
        cache_key(&self.search_query, self.sort, self.season)
    }
}

/// Pagination position of the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_available: u32,
    pub has_next_page: bool,
}

impl PageCursor {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            items_per_page,
            total_available: 0,
            has_next_page: true,
        }
    }
}

/// In-flight and error flags
///
/// At most one of `loading` and `loading_more` is set at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFlags {
    pub loading: bool,
    pub loading_more: bool,
    pub error: String,
}

/// State of the listing as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingPhase {
    Idle,
    LoadingFresh,
    LoadingMore,
    Error,
}

impl LoadingFlags {
    pub fn phase(&self) -> ListingPhase {
        if self.loading {
            ListingPhase::LoadingFresh
        } else if self.loading_more {
            ListingPhase::LoadingMore
        } else if !self.error.is_empty() {
            ListingPhase::Error
        } else {
            ListingPhase::Idle
        }
    }
}

/// Read-only projection published to subscribers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub items: Vec<Media>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: String,
    pub has_more_to_show: bool,
    pub current_count: usize,
}

/// Complete session state, used for SSR hand-off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingState {
    pub filters: FilterState,
    pub cursor: PageCursor,
    pub flags: LoadingFlags,
    pub items: Vec<Media>,
    pub cache: ResultCache,
}

impl ListingState {
    /// Empty session on page 1 with the given filters
    pub fn fresh(filters: FilterState, items_per_page: u32) -> Self {
        Self {
            filters,
            cursor: PageCursor::new(items_per_page),
            flags: LoadingFlags::default(),
            items: Vec::new(),
            cache: ResultCache::new(),
        }
    }

    pub fn view(&self) -> ListingView {
        ListingView {
            items: self.items.clone(),
            loading: self.flags.loading,
            loading_more: self.flags.loading_more,
            error: self.flags.error.clone(),
            has_more_to_show: self.cursor.has_next_page,
            current_count: self.items.len(),
        }
    }
}
