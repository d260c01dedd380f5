//! AniList GraphQL API client implementation.
//!
//! This module provides a rate-limited client for the AniList GraphQL API
//! that serves as the production [`FetchGateway`](crate::gateway::FetchGateway).

pub mod client;
pub mod rate_limiter;
pub mod types;

pub use client::AniListClient;
pub use rate_limiter::RateLimiter;
