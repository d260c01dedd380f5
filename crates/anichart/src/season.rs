//! Season calculator.
//!
//! Maps calendar dates onto the four airing quarters and implements the
//! year rollover used whenever a season is attached to a request.

use chrono::{Datelike, Local, NaiveDate};
use shared::{Season, SeasonInfo};

/// Source of "today" for season resolution
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Season and year for a date (Jan-Mar winter, Apr-Jun spring, Jul-Sep summer, Oct-Dec fall)
pub fn current_season(now: impl Datelike) -> SeasonInfo {
    let season = match now.month() {
        1..=3 => Season::Winter,
        4..=6 => Season::Spring,
        7..=9 => Season::Summer,
        _ => Season::Fall,
    };

    SeasonInfo {
        season,
        year: now.year(),
    }
}

/// The two seasons preceding `season`, nearest first
pub fn adjacent_seasons(season: Season) -> [Season; 2] {
    let prior = previous(season);
    [prior, previous(prior)]
}

fn previous(season: Season) -> Season {
    match season {
        Season::Winter => Season::Fall,
        Season::Spring => Season::Winter,
        Season::Summer => Season::Spring,
        Season::Fall => Season::Summer,
    }
}

/// Query year for `selected` given the actual current season
///
/// Winter asked for during fall means the upcoming winter.
pub fn season_year(selected: Season, current: SeasonInfo) -> i32 {
    if selected == Season::Winter && current.season == Season::Fall {
        current.year + 1
    } else {
        current.year
    }
}
