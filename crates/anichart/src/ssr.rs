//! Server-side render boundary.
//!
//! Each request gets its own orchestrator, so no listing state leaks between
//! requests. The resulting session state is returned as JSON for hydration.

use crate::gateway::FetchGateway;
use crate::orchestrator::ListingOrchestrator;
use crate::season::Clock;
use crate::state::ListingState;
use anyhow::{Context, Result};
use maud::{html, Markup};
use serde_json::Value;
use shared::config::ListingConfig;
use shared::Media;
use std::sync::Arc;
use tracing::info;

/// Placeholder replaced by the rendered markup
pub const HTML_PLACEHOLDER: &str = "<!--app-html-->";

/// Placeholder replaced by the state script
pub const STATE_PLACEHOLDER: &str = "<!--app-state-->";

/// Template used when none is supplied
pub const DEFAULT_TEMPLATE: &str = "<!DOCTYPE html>
<html lang=\"en\">
<head><meta charset=\"utf-8\"><title>AniChart</title></head>
<body>
<div id=\"app\"><!--app-html--></div>
<!--app-state-->
</body>
</html>
";

/// Markup and serialized state for one request
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub html: String,
    pub state: Value,
}

/// Page addressed by a request URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Listing,
    Details(u32),
}

impl Route {
    /// Unknown paths fall back to the listing
    pub fn parse(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["anime", id] => id.parse().map(Route::Details).unwrap_or(Route::Listing),
            _ => Route::Listing,
        }
    }
}

/// Render `url` with a fresh listing session
pub async fn render<G: FetchGateway>(
    url: &str,
    gateway: G,
    clock: Arc<dyn Clock>,
    config: &ListingConfig,
) -> Result<RenderResult> {
    let mut listing = ListingOrchestrator::new(gateway, clock, config);
    let route = Route::parse(url);
    info!(url = url, route = ?route, "Rendering page");

    let html = match route {
        Route::Listing => {
            listing.load_initial_data().await;
            render_listing(listing.state())
        }
        Route::Details(id) => match listing.load_details(id).await {
            Ok(media) => render_details(&media),
            Err(_) => render_details_error(),
        },
    }
    .into_string();

    let state = serde_json::to_value(listing.snapshot()).context("Failed to serialize listing state")?;

    Ok(RenderResult { html, state })
}

/// Restore a session state produced by [`render`]
pub fn hydrate_state(state: Value) -> Result<ListingState> {
    serde_json::from_value(state).context("Failed to parse listing state")
}

/// Fill the template placeholders with a render result
pub fn inject(template: &str, result: &RenderResult) -> String {
    // `<` escaped so the JSON cannot close the script element
    let state_json = result.state.to_string().replace('<', "\\u003c");
    let script = format!("<script>window.__INITIAL_STATE__={}</script>", state_json);

    template
        .replace(HTML_PLACEHOLDER, &result.html)
        .replace(STATE_PLACEHOLDER, &script)
}

fn render_listing(state: &ListingState) -> Markup {
    let season = state.filters.season.map(|s| s.as_str()).unwrap_or_default();

    html! {
        section class="anime-list" data-season=(season) {
            @if !state.items.is_empty() {
                ul {
                    @for media in &state.items {
                        (render_card(media))
                    }
                }
            }
            @if !state.flags.error.is_empty() {
                p class="error" { (state.flags.error) }
            } @else if state.items.is_empty() {
                p class="empty" { "No anime found." }
            }
            @if state.cursor.has_next_page && !state.items.is_empty() {
                button data-action="load-more" { "Load more" }
            }
        }
    }
}

fn render_card(media: &Media) -> Markup {
    let title = media.display_title();
    let cover = media
        .cover_image
        .as_ref()
        .and_then(|cover| cover.large.as_deref().or(cover.medium.as_deref()));

    let mut meta = Vec::new();
    if let Some(format) = &media.format {
        meta.push(format.clone());
    }
    if let Some(episodes) = media.episodes {
        meta.push(format!("{} episodes", episodes));
    }
    if let Some(score) = media.average_score {
        meta.push(format!("{}%", score));
    }

    html! {
        li data-id=(media.id) {
            a href={ "/anime/" (media.id) } {
                @if let Some(src) = cover {
                    img src=(src) alt=(title);
                }
                h2 { (title) }
            }
            p class="meta" { (meta.join(" · ")) }
        }
    }
}

fn render_details(media: &Media) -> Markup {
    html! {
        article class="anime-detail" data-id=(media.id) {
            h1 { (media.display_title()) }
            @if let Some(description) = &media.description {
                p class="description" { (description) }
            }
            @if !media.genres.is_empty() {
                ul class="genres" {
                    @for genre in &media.genres {
                        li { (genre) }
                    }
                }
            }
        }
    }
}

fn render_details_error() -> Markup {
    html! {
        p class="error" { "Failed to load anime details." }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MediaPage, PageInfo, RequestParams};
    use crate::season::FixedClock;
    use chrono::NaiveDate;
    use shared::{MediaTitle, Season};

    /// Gateway with one canned listing page and one canned detail record
    struct StaticGateway {
        page: Vec<Media>,
        details: Option<Media>,
    }

    impl FetchGateway for StaticGateway {
        async fn fetch_page(&self, _params: &RequestParams) -> Result<MediaPage, GatewayError> {
            Ok(MediaPage {
                items: self.page.clone(),
                page_info: PageInfo {
                    total: Some(100),
                    has_next_page: Some(true),
                    ..Default::default()
                },
            })
        }

        async fn fetch_details(&self, _id: u32) -> Result<Media, GatewayError> {
            self.details.clone().ok_or(GatewayError::MissingData("Media"))
        }
    }

    fn titled(id: u32, title: &str) -> Media {
        Media {
            id,
            title: MediaTitle {
                romaji: Some(title.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()))
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Listing);
        assert_eq!(Route::parse("/anime"), Route::Listing);
        assert_eq!(Route::parse("/anime/21?tab=info"), Route::Details(21));
        assert_eq!(Route::parse("/anime/abc"), Route::Listing);
        assert_eq!(Route::parse("/somewhere/else"), Route::Listing);
    }

    #[tokio::test]
    async fn test_render_listing_and_hydrate() {
        let gateway = StaticGateway {
            page: vec![titled(1, "Apothecary <Diaries>"), titled(2, "Dandadan")],
            details: None,
        };

        let result = render("/anime", gateway, clock(), &ListingConfig::default())
            .await
            .unwrap();

        assert!(result.html.contains("data-season=\"SPRING\""));
        assert!(result.html.contains("Apothecary &lt;Diaries&gt;"));
        assert!(result.html.contains("href=\"/anime/2\""));
        assert!(result.html.contains("data-action=\"load-more\""));

        let state = hydrate_state(result.state).unwrap();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.filters.season, Some(Season::Spring));
        assert!(state.cache.get("-POPULARITY_DESC-SPRING").is_some());
    }

    #[tokio::test]
    async fn test_render_details_failure_is_contained() {
        let gateway = StaticGateway {
            page: Vec::new(),
            details: None,
        };

        let result = render("/anime/5", gateway, clock(), &ListingConfig::default())
            .await
            .unwrap();

        assert!(result.html.contains("Failed to load anime details."));
        assert!(hydrate_state(result.state).unwrap().flags.error.is_empty());
    }

    #[tokio::test]
    async fn test_render_details() {
        let mut media = titled(5, "Frieren");
        media.genres = vec!["Adventure".to_string()];
        media.description = Some("<script>alert(\"x\")</script>".to_string());
        let gateway = StaticGateway {
            page: Vec::new(),
            details: Some(media),
        };

        let result = render("/anime/5", gateway, clock(), &ListingConfig::default())
            .await
            .unwrap();

        assert!(result.html.contains("<h1>Frieren</h1>"));
        assert!(result.html.contains("<li>Adventure</li>"));
        assert!(result.html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"));
        assert!(!result.html.contains("<script>"));
    }

    #[test]
    fn test_inject_escapes_script_breakout() {
        let result = RenderResult {
            html: "<p>hi</p>".to_string(),
            state: serde_json::json!({"search": "</script><b>"}),
        };

        let page = inject(DEFAULT_TEMPLATE, &result);

        assert!(page.contains("<div id=\"app\"><p>hi</p></div>"));
        assert!(page.contains("window.__INITIAL_STATE__={\"search\":\"\\u003c/script>\\u003cb>\"}"));
        assert!(!page.contains(HTML_PLACEHOLDER));
        assert!(!page.contains(STATE_PLACEHOLDER));
    }
}
