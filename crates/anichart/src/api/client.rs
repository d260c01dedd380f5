//! AniList GraphQL client with rate limiting.

use super::rate_limiter::RateLimiter;
use super::types::{
    details_query, page_query, DetailsVariables, GraphQlRequest, GraphQlResponse, MediaData, PageData,
};
use crate::gateway::{FetchGateway, GatewayError, MediaPage, RequestParams};
use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::config::AniListConfig;
use shared::Media;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// AniList GraphQL client
#[derive(Debug)]
pub struct AniListClient {
    /// HTTP client
    client: Client,
    /// GraphQL endpoint
    api_url: String,
    /// Rate limiter
    rate_limiter: Mutex<RateLimiter>,
    page_query: String,
    details_query: String,
}

impl AniListClient {
    /// Create a new AniList client
    pub fn new(config: &AniListConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            rate_limiter: Mutex::new(RateLimiter::new(config.requests_per_minute)),
            page_query: page_query(),
            details_query: details_query(),
        })
    }

    /// Send one GraphQL query and return its `data`
    ///
    /// GraphQL `errors` are reported even when the HTTP status is 200.
    async fn query<V, T>(&self, query: &str, variables: V) -> Result<T, GatewayError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let requests_in_window = {
            let mut limiter = self.rate_limiter.lock().await;
            limiter.acquire().await;
            limiter.current_minute_count()
        };

        debug!(url = %self.api_url, requests_in_window, "Making GraphQL request");

        let response = self
            .client
            .post(&self.api_url)
            .header(ACCEPT, "application/json")
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<GraphQlResponse<T>>(&body);

        if !status.is_success() {
            if let Ok(GraphQlResponse { errors, .. }) = &parsed {
                if !errors.is_empty() {
                    warn!(status = %status, errors = errors.len(), "GraphQL request rejected");
                    return Err(GatewayError::Api(errors.iter().map(|e| e.message.clone()).collect()));
                }
            }

            warn!(status = %status, body = %body, "Request failed");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parsed?;
        if !parsed.errors.is_empty() {
            warn!(errors = parsed.errors.len(), "GraphQL response contained errors");
            return Err(GatewayError::Api(
                parsed.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        parsed.data.ok_or(GatewayError::MissingData("data"))
    }
}

impl FetchGateway for AniListClient {
    async fn fetch_page(&self, params: &RequestParams) -> Result<MediaPage, GatewayError> {
        debug!(page = params.page, per_page = params.per_page, "Fetching anime page");
        let data: PageData = self.query(&self.page_query, params).await?;
        let page = data.page.ok_or(GatewayError::MissingData("Page"))?;
        Ok(page.into())
    }

    async fn fetch_details(&self, id: u32) -> Result<Media, GatewayError> {
        debug!(id = id, "Fetching anime details");
        let data: MediaData = self
            .query(&self.details_query, DetailsVariables { id })
            .await?;
        data.media.ok_or(GatewayError::MissingData("Media"))
    }
}
