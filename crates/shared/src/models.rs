//! Data models for the project.
//!
//! This module defines the media records returned by AniList and the
//! enumerations (seasons, sort keys) that make up a listing filter.

use serde::{Deserialize, Deserializer, Serialize};

/// Airing season, one of four fixed quarters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Chronological order within a year
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "WINTER",
            Season::Spring => "SPRING",
            Season::Summer => "SUMMER",
            Season::Fall => "FALL",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WINTER" => Ok(Season::Winter),
            "SPRING" => Ok(Season::Spring),
            "SUMMER" => Ok(Season::Summer),
            "FALL" => Ok(Season::Fall),
            _ => Err(anyhow::anyhow!("Invalid season: {}", s)),
        }
    }
}

/// A season paired with the year it belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonInfo {
    pub season: Season,
    pub year: i32,
}

/// AniList media sort keys
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaSort {
    #[default]
    PopularityDesc,
    Popularity,
    ScoreDesc,
    Score,
    TrendingDesc,
    FavouritesDesc,
    StartDateDesc,
    StartDate,
    TitleRomaji,
    TitleEnglish,
    EpisodesDesc,
    UpdatedAtDesc,
}

impl MediaSort {
    pub const ALL: [MediaSort; 12] = [
        MediaSort::PopularityDesc,
        MediaSort::Popularity,
        MediaSort::ScoreDesc,
        MediaSort::Score,
        MediaSort::TrendingDesc,
        MediaSort::FavouritesDesc,
        MediaSort::StartDateDesc,
        MediaSort::StartDate,
        MediaSort::TitleRomaji,
        MediaSort::TitleEnglish,
        MediaSort::EpisodesDesc,
        MediaSort::UpdatedAtDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaSort::PopularityDesc => "POPULARITY_DESC",
            MediaSort::Popularity => "POPULARITY",
            MediaSort::ScoreDesc => "SCORE_DESC",
            MediaSort::Score => "SCORE",
            MediaSort::TrendingDesc => "TRENDING_DESC",
            MediaSort::FavouritesDesc => "FAVOURITES_DESC",
            MediaSort::StartDateDesc => "START_DATE_DESC",
            MediaSort::StartDate => "START_DATE",
            MediaSort::TitleRomaji => "TITLE_ROMAJI",
            MediaSort::TitleEnglish => "TITLE_ENGLISH",
            MediaSort::EpisodesDesc => "EPISODES_DESC",
            MediaSort::UpdatedAtDesc => "UPDATED_AT_DESC",
        }
    }
}

impl std::fmt::Display for MediaSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_uppercase();
        MediaSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Invalid sort key: {}", s))
    }
}

/// Anime record from AniList
///
/// Identity is `id`; everything else is display data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: u32,
    #[serde(default)]
    pub title: MediaTitle,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub season_year: Option<i32>,
    #[serde(default)]
    pub average_score: Option<u32>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_adult: bool,
    #[serde(default)]
    pub site_url: Option<String>,
}

impl Media {
    /// Best display title: English, then romaji, then native
    pub fn display_title(&self) -> &str {
        self.title
            .english
            .as_deref()
            .or(self.title.romaji.as_deref())
            .or(self.title.native.as_deref())
            .unwrap_or("Untitled")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CoverImage {
    pub large: Option<String>,
    pub medium: Option<String>,
    pub color: Option<String>,
}

/// AniList sends `null` for some list/flag fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_parse_and_display() {
        for season in Season::ALL {
            let parsed: Season = season.to_string().parse().unwrap();
            assert_eq!(parsed, season);
        }
        assert_eq!("fall".parse::<Season>().unwrap(), Season::Fall);
        assert!("autumn".parse::<Season>().is_err());
    }

    #[test]
    fn test_sort_names_have_no_separator() {
        for sort in MediaSort::ALL {
            assert!(!sort.as_str().contains('-'));
            let json = serde_json::to_string(&sort).unwrap();
            assert_eq!(json, format!("\"{}\"", sort.as_str()));
        }
    }

    #[test]
    fn test_media_tolerates_nulls() {
        let media: Media = serde_json::from_str(
            r#"{"id": 7, "title": {"romaji": "Kimi", "english": null, "native": null},
                "genres": null, "isAdult": null, "season": "SPRING"}"#,
        )
        .unwrap();
        assert_eq!(media.id, 7);
        assert!(media.genres.is_empty());
        assert!(!media.is_adult);
        assert_eq!(media.season, Some(Season::Spring));
        assert_eq!(media.display_title(), "Kimi");
    }
}
