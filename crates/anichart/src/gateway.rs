//! Fetch gateway contract.
//!
//! The orchestrator talks to the upstream API only through [`FetchGateway`],
//! so the AniList client and test doubles are interchangeable.

use serde::{Deserialize, Serialize};
use shared::{Media, MediaSort, Season};
use std::future::Future;
use thiserror::Error;

/// Parameters for one paginated listing request
///
/// Serializes straight into GraphQL variables; unset optionals are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParams {
    pub page: u32,
    pub per_page: u32,
    pub sort: Vec<MediaSort>,
    pub is_adult: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_year: Option<i32>,
}

impl RequestParams {
    /// Same request pinned to another season
    pub fn with_season(mut self, season: Season, season_year: i32) -> Self {
        self.season = Some(season);
        self.season_year = Some(season_year);
        self
    }

    /// Same request with the season filter dropped
    pub fn without_season(mut self) -> Self {
        self.season = None;
        self.season_year = None;
        self.is_adult = false;
        self
    }
}

/// Pagination metadata; every field may be missing upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub has_next_page: Option<bool>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// One page of listing results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaPage {
    pub items: Vec<Media>,
    pub page_info: PageInfo,
}

/// Transport or API failure reported by a gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API returned errors: {}", .0.join("; "))]
    Api(Vec<String>),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response did not contain {0}")]
    MissingData(&'static str),
}

/// Upstream data source for listings and detail views
pub trait FetchGateway: Send + Sync {
    /// Issue one paginated listing request
    fn fetch_page(
        &self,
        params: &RequestParams,
    ) -> impl Future<Output = Result<MediaPage, GatewayError>> + Send;

    /// Fetch a single media record by id
    fn fetch_details(&self, id: u32) -> impl Future<Output = Result<Media, GatewayError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RequestParams {
        RequestParams {
            page: 1,
            per_page: 50,
            sort: vec![MediaSort::PopularityDesc],
            is_adult: false,
            search: Some("frieren".to_string()),
            season: Some(Season::Summer),
            season_year: Some(2025),
        }
    }

    #[test]
    fn test_variables_omit_unset_fields() {
        let params = base().without_season();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "page": 1,
                "perPage": 50,
                "sort": ["POPULARITY_DESC"],
                "isAdult": false,
                "search": "frieren"
            })
        );
    }

    #[test]
    fn test_with_season_keeps_other_fields() {
        let params = base().with_season(Season::Spring, 2025);
        assert_eq!(params.season, Some(Season::Spring));
        assert_eq!(params.season_year, Some(2025));
        assert_eq!(params.search.as_deref(), Some("frieren"));
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_api_error_message_joins_entries() {
        let err = GatewayError::Api(vec!["Not Found.".to_string(), "Bad".to_string()]);
        assert_eq!(err.to_string(), "API returned errors: Not Found.; Bad");
    }
}
