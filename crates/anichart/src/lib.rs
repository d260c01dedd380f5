//! AniChart listing core.
//!
//! Drives the seasonal anime listing: builds AniList queries from filter
//! state, caches page-1 results per filter combination, falls back to nearby
//! seasons when a season comes back empty, and hands the session state to
//! the server-side renderer.

pub mod api;
pub mod cache;
pub mod content_filter;
pub mod gateway;
pub mod orchestrator;
pub mod query;
pub mod season;
pub mod ssr;
pub mod state;

pub use api::{AniListClient, RateLimiter};
pub use cache::{cache_key, CacheEntry, ResultCache};
pub use gateway::{FetchGateway, GatewayError, MediaPage, PageInfo, RequestParams};
pub use orchestrator::{ListingOrchestrator, LOAD_ERROR_MESSAGE};
pub use season::{Clock, FixedClock, SystemClock};
pub use ssr::{render, RenderResult};
pub use state::{FilterState, ListingPhase, ListingState, ListingView, LoadingFlags, PageCursor};
