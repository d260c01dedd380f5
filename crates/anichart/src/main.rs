//! AniChart CLI application.

use anichart::season::current_season;
use anichart::ssr::{inject, DEFAULT_TEMPLATE};
use anichart::{
    render, AniListClient, Clock, FilterState, ListingOrchestrator, ListingState, SystemClock,
};
use anyhow::{Context, Result};
use clap::Parser;
use shared::{Config, LogConfig, MediaSort, Season};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Search text
    #[arg(long)]
    search: Option<String>,

    /// Sort key, e.g. POPULARITY_DESC or SCORE_DESC
    #[arg(long, value_parser = parse_sort)]
    sort: Option<MediaSort>,

    /// Season filter (WINTER, SPRING, SUMMER, FALL or "none")
    #[arg(long, value_parser = parse_season)]
    season: Option<SeasonFilter>,

    /// Number of additional pages to load after the first
    #[arg(long, default_value_t = 0)]
    pages: u32,

    /// Render this URL server-side instead of listing
    #[arg(long)]
    render: Option<String>,

    /// HTML template for --render
    #[arg(long, requires = "render")]
    template: Option<PathBuf>,

    /// Output file (rendered page with --render, listing JSON otherwise)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_sort(value: &str) -> Result<MediaSort, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

/// Season given on the command line; `none` lifts the season filter
#[derive(Debug, Clone, Copy)]
struct SeasonFilter(Option<Season>);

fn parse_season(value: &str) -> Result<SeasonFilter, String> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(SeasonFilter(None));
    }
    value
        .parse()
        .map(|season| SeasonFilter(Some(season)))
        .map_err(|e: anyhow::Error| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    config.apply_env_overrides();

    // Initialize logging
    shared::logging::init(LogConfig::from_settings(&config.logging, "anichart", args.verbose))?;

    info!("AniChart starting");
    info!(config_file = %args.config.display(), api_url = %config.anilist.api_url, "Loaded configuration");

    let client = AniListClient::new(&config.anilist).context("Failed to create AniList client")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if let Some(url) = &args.render {
        let template = match &args.template {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template: {}", path.display()))?,
            None => DEFAULT_TEMPLATE.to_string(),
        };

        let result = render(url, client, clock, &config.listing)
            .await
            .with_context(|| format!("Failed to render {}", url))?;
        let page = inject(&template, &result);

        let output = args.output.unwrap_or_else(|| PathBuf::from("index.html"));
        std::fs::write(&output, page)
            .with_context(|| format!("Failed to write page: {}", output.display()))?;

        info!(url = %url, output = %output.display(), "Page rendered");
        return Ok(());
    }

    // Seed the filters without triggering a load per flag
    let mut filters = FilterState::new(
        config.listing.default_sort,
        Some(current_season(clock.today()).season),
    );
    if let Some(search) = args.search {
        filters.search_query = search;
    }
    if let Some(sort) = args.sort {
        filters.sort = sort;
    }
    if let Some(SeasonFilter(season)) = args.season {
        filters.season = season;
    }
    let state = ListingState::fresh(filters, config.listing.items_per_page);
    let mut listing = ListingOrchestrator::hydrate(client, clock, &config.listing, state);

    listing.load_initial_data().await;
    for _ in 0..args.pages {
        if !listing.cursor().has_next_page || !listing.flags().error.is_empty() {
            break;
        }
        listing.load_more().await;
    }

    let view = listing.view();
    if !view.error.is_empty() {
        warn!(error = %view.error, "Listing finished with an error");
    }

    info!("=== Listing ===");
    info!(
        season = ?listing.filters().season,
        sort = %listing.filters().sort,
        search = %listing.filters().search_query,
        "Filters"
    );
    for media in &view.items {
        info!(id = media.id, score = ?media.average_score, "{}", media.display_title());
    }
    info!(
        shown = view.current_count,
        total = listing.cursor().total_available,
        page = listing.cursor().current_page,
        has_more = view.has_more_to_show,
        "Listing complete"
    );

    if let Some(output) = &args.output {
        let json = serde_json::to_string_pretty(&view).context("Failed to serialize listing")?;
        std::fs::write(output, json)
            .with_context(|| format!("Failed to write listing: {}", output.display()))?;
        info!(output = %output.display(), "Listing written");
    }

    Ok(())
}
