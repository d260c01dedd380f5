//! Anime listing orchestrator.
//!
//! Owns the filter state, page cursor, loading flags and result cache of one
//! listing session, and drives the cache check, fetch, fallback search,
//! content filtering and cache write for every load.

use crate::cache::{CacheEntry, ResultCache};
use crate::content_filter::filter_safe;
use crate::gateway::{FetchGateway, GatewayError, MediaPage, PageInfo, RequestParams};
use crate::query::build_params;
use crate::season::{adjacent_seasons, current_season, season_year, Clock};
use crate::state::{FilterState, ListingPhase, ListingState, ListingView, LoadingFlags, PageCursor};
use shared::config::ListingConfig;
use shared::{Media, MediaSort, Season, SeasonInfo};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Message shown to the user when a listing load fails
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load anime data. Please try again.";

/// Result of a successful fallback query
struct FallbackHit {
    /// Season that produced results, `None` for the season-less query
    season: Option<Season>,
    page: MediaPage,
}

/// Listing session state machine
///
/// One instance per session or server request; all mutation goes through the
/// public operations, and every change is published to subscribers.
pub struct ListingOrchestrator<G> {
    gateway: G,
    clock: Arc<dyn Clock>,
    default_sort: MediaSort,
    state: ListingState,
    notifier: watch::Sender<ListingView>,
}

impl<G: FetchGateway> ListingOrchestrator<G> {
    /// Create a fresh session filtered to the current season
    pub fn new(gateway: G, clock: Arc<dyn Clock>, config: &ListingConfig) -> Self {
        let season = current_season(clock.today()).season;
        let filters = FilterState::new(config.default_sort, Some(season));
        let state = ListingState::fresh(filters, config.items_per_page);

        Self::hydrate(gateway, clock, config, state)
    }

    /// Restore a session from a serialized state
    pub fn hydrate(
        gateway: G,
        clock: Arc<dyn Clock>,
        config: &ListingConfig,
        state: ListingState,
    ) -> Self {
        let (notifier, _) = watch::channel(state.view());

        Self {
            gateway,
            clock,
            default_sort: config.default_sort,
            state,
            notifier,
        }
    }

    /// Copy of the full session state for serialization
    pub fn snapshot(&self) -> ListingState {
        self.state.clone()
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn view(&self) -> ListingView {
        self.state.view()
    }

    pub fn phase(&self) -> ListingPhase {
        self.state.flags.phase()
    }

    pub fn items(&self) -> &[Media] {
        &self.state.items
    }

    pub fn filters(&self) -> &FilterState {
        &self.state.filters
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.state.cursor
    }

    pub fn flags(&self) -> &LoadingFlags {
        &self.state.flags
    }

    pub fn cache(&self) -> &ResultCache {
        &self.state.cache
    }

    /// Receive a new view after every state change
    pub fn subscribe(&self) -> watch::Receiver<ListingView> {
        self.notifier.subscribe()
    }

    pub async fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.filters.search_query = query.into();
        self.load(true).await;
    }

    pub async fn set_sort(&mut self, sort: MediaSort) {
        self.state.filters.sort = sort;
        self.load(true).await;
    }

    pub async fn set_season(&mut self, season: Option<Season>) {
        self.state.filters.season = season;
        self.load(true).await;
    }

    /// Reset search, sort and season, then reload
    pub async fn clear_filters(&mut self) {
        self.state.filters = FilterState::new(self.default_sort, None);
        self.load(true).await;
    }

    /// First load of a session; does nothing once items are present
    pub async fn load_initial_data(&mut self) {
        if self.state.items.is_empty() && !self.state.flags.loading {
            self.load(true).await;
        }
    }

    /// Fetch and append the next page
    ///
    /// Ignored while any load is in flight or when the upstream reported no
    /// further pages.
    pub async fn load_more(&mut self) {
        let flags = &self.state.flags;
        if flags.loading || flags.loading_more || !self.state.cursor.has_next_page {
            debug!(
                loading = flags.loading,
                loading_more = flags.loading_more,
                has_next_page = self.state.cursor.has_next_page,
                "Skipping load more"
            );
            return;
        }

        // Stays advanced even if the fetch fails.
        self.state.cursor.current_page += 1;
        self.load(false).await;
    }

    /// Drop items, flags, cursor and cache; filters are kept
    pub fn reset_state(&mut self) {
        self.state.items.clear();
        self.state.flags = LoadingFlags::default();
        self.state.cursor = PageCursor::new(self.state.cursor.items_per_page);
        self.state.cache.clear();
        self.publish();
    }

    /// Look up an item among those currently displayed
    pub fn get_by_id(&self, id: u32) -> Option<&Media> {
        self.state.items.iter().find(|media| media.id == id)
    }

    /// Fetch one item fresh from upstream
    ///
    /// Failures go back to the caller and leave the listing error untouched.
    pub async fn load_details(&self, id: u32) -> Result<Media, GatewayError> {
        self.gateway.fetch_details(id).await.map_err(|err| {
            error!(id = id, error = %err, "Error loading anime details");
            err
        })
    }

    /// Load the listing for the current filters
    ///
    /// A fresh load (`reset_fresh`) starts from page 1 and is served from the
    /// cache when possible; otherwise the current page is fetched and
    /// appended. Failures end up in the error flag, never in the return value.
    pub async fn load(&mut self, reset_fresh: bool) {
        let cache_key = self.state.filters.cache_key();

        if reset_fresh {
            if let Some(entry) = self.state.cache.get(&cache_key).cloned() {
                self.state.items = entry.items;
                self.state.cursor.has_next_page = entry.has_more;
                self.state.cursor.current_page = entry.page;
                self.state.cursor.total_available = entry.total;
                self.publish();
                return;
            }

            self.state.flags.loading = true;
            self.state.cursor.current_page = 1;
        } else {
            self.state.flags.loading_more = true;
        }
        self.state.flags.error.clear();
        self.publish();

        // Displayed items stay as they were when the fetch fails.
        if let Err(err) = self.fetch_into_state(reset_fresh, &cache_key).await {
            error!(
                error = %err,
                cache_key = %cache_key,
                page = self.state.cursor.current_page,
                "Error loading anime data"
            );
            self.state.flags.error = LOAD_ERROR_MESSAGE.to_string();
        }

        self.state.flags.loading = false;
        self.state.flags.loading_more = false;
        self.publish();
    }

    async fn fetch_into_state(&mut self, reset_fresh: bool, cache_key: &str) -> Result<(), GatewayError> {
        let current = self.current_season();
        let params = build_params(&self.state.filters, &self.state.cursor, current);

        debug!(
            page = params.page,
            search = ?params.search,
            season = ?params.season,
            season_year = ?params.season_year,
            "Fetching anime page"
        );
        let page = self.gateway.fetch_page(&params).await?;

        let wants_fallback = reset_fresh
            && page.items.is_empty()
            && self.state.filters.season.is_some()
            && self.state.items.is_empty();

        if wants_fallback {
            if let Some(hit) = self.fallback_search(params, current).await? {
                self.state.items = filter_safe(hit.page.items);
                self.apply_page_info(&hit.page.page_info);
                self.state.filters.season = hit.season;

                let fallback_key = self.state.filters.cache_key();
                self.write_cache(fallback_key);
                return Ok(());
            }
        }

        let fetched = filter_safe(page.items);
        if reset_fresh {
            self.state.items = fetched;
        } else {
            self.state.items.extend(fetched);
        }
        self.apply_page_info(&page.page_info);
        self.write_cache(cache_key.to_string());

        info!(
            items = self.state.items.len(),
            page = self.state.cursor.current_page,
            total = self.state.cursor.total_available,
            has_next_page = self.state.cursor.has_next_page,
            "Anime listing loaded"
        );

        Ok(())
    }

    /// Try the two preceding seasons, then no season at all
    ///
    /// Strictly sequential; the first non-empty page wins.
    async fn fallback_search(
        &self,
        base: RequestParams,
        current: SeasonInfo,
    ) -> Result<Option<FallbackHit>, GatewayError> {
        info!(
            season = ?self.state.filters.season,
            "No results for season, trying fallbacks"
        );

        for season in adjacent_seasons(current.season) {
            let params = base.clone().with_season(season, season_year(season, current));
            let page = self.gateway.fetch_page(&params).await?;

            if !page.items.is_empty() {
                info!(season = %season, year = ?params.season_year, "Found results in fallback season");
                return Ok(Some(FallbackHit {
                    season: Some(season),
                    page,
                }));
            }
        }

        let page = self.gateway.fetch_page(&base.without_season()).await?;
        if !page.items.is_empty() {
            info!("Found results without season filter");
            return Ok(Some(FallbackHit { season: None, page }));
        }

        info!("Fallback search found nothing");
        Ok(None)
    }

    fn apply_page_info(&mut self, page_info: &PageInfo) {
        self.state.cursor.total_available = page_info.total.unwrap_or(0);
        self.state.cursor.has_next_page = page_info.has_next_page.unwrap_or(false);
    }

    fn write_cache(&mut self, key: String) {
        let entry = CacheEntry {
            items: self.state.items.clone(),
            page: self.state.cursor.current_page,
            has_more: self.state.cursor.has_next_page,
            total: self.state.cursor.total_available,
        };
        self.state.cache.put(key, entry);
    }

    fn current_season(&self) -> SeasonInfo {
        current_season(self.clock.today())
    }

    fn publish(&self) {
        self.notifier.send_replace(self.state.view());
    }
}
