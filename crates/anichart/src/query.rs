//! Query builder: filter state to upstream request parameters.

use crate::gateway::RequestParams;
use crate::season::season_year;
use crate::state::{FilterState, PageCursor};
use shared::SeasonInfo;

/// Build request parameters for the current filters and page
///
/// `current` is the actual season at the time of the request; it decides the
/// year attached to a season filter. Adult titles are always excluded here.
pub fn build_params(filters: &FilterState, cursor: &PageCursor, current: SeasonInfo) -> RequestParams {
    let search = filters.search_query.trim();

    RequestParams {
        page: cursor.current_page,
        per_page: cursor.items_per_page,
        sort: vec![filters.sort],
        is_adult: false,
        search: (!search.is_empty()).then(|| search.to_string()),
        season: filters.season,
        season_year: filters.season.map(|season| season_year(season, current)),
    }
}
