//! AniList GraphQL request and response types.

use crate::gateway::{MediaPage, PageInfo};
use serde::{Deserialize, Serialize};
use shared::Media;

/// Selection set shared by the listing and detail queries
const MEDIA_FIELDS: &str = "
    id
    title { romaji english native }
    coverImage { large medium color }
    bannerImage
    description
    episodes
    duration
    format
    status
    season
    seasonYear
    averageScore
    popularity
    genres
    isAdult
    siteUrl
";

/// Paginated anime listing query
pub fn page_query() -> String {
    format!(
        "query ($page: Int, $perPage: Int, $sort: [MediaSort], $isAdult: Boolean, \
         $search: String, $season: MediaSeason, $seasonYear: Int) {{
  Page(page: $page, perPage: $perPage) {{
    pageInfo {{ total currentPage lastPage hasNextPage perPage }}
    media(type: ANIME, sort: $sort, isAdult: $isAdult, search: $search, \
         season: $season, seasonYear: $seasonYear) {{{MEDIA_FIELDS}}}
  }}
}}"
    )
}

/// Single anime query
pub fn details_query() -> String {
    format!(
        "query ($id: Int) {{
  Media(id: $id, type: ANIME) {{{MEDIA_FIELDS}}}
}}"
    )
}

/// GraphQL request body
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// Variables for the detail query
#[derive(Debug, Clone, Serialize)]
pub struct DetailsVariables {
    pub id: u32,
}

/// GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// Error entry from a GraphQL response
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` of the listing query
#[derive(Debug, Clone, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: Option<PageBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBody {
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub media: Option<Vec<Media>>,
}

impl From<PageBody> for MediaPage {
    fn from(body: PageBody) -> Self {
        MediaPage {
            items: body.media.unwrap_or_default(),
            page_info: body.page_info.unwrap_or_default(),
        }
    }
}

/// `data` of the detail query
#[derive(Debug, Clone, Deserialize)]
pub struct MediaData {
    #[serde(rename = "Media")]
    pub media: Option<Media>,
}
