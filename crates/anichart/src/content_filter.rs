//! Restricted-content filter applied to every fetched result set.

use shared::Media;

/// Genre tags that hide an item regardless of its adult flag
const BANNED_GENRES: [&str; 2] = ["adult", "hentai"];

/// Whether an item may be shown in the listing
pub fn is_safe(media: &Media) -> bool {
    !media.is_adult
        && !media.genres.iter().any(|genre| {
            BANNED_GENRES
                .iter()
                .any(|banned| genre.eq_ignore_ascii_case(banned))
        })
}

/// Drop restricted items, keeping the order of the rest
pub fn filter_safe(items: Vec<Media>) -> Vec<Media> {
    items.into_iter().filter(is_safe).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: u32, is_adult: bool, genres: &[&str]) -> Media {
        Media {
            id,
            is_adult,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    fn ids(items: &[Media]) -> Vec<u32> {
        items.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_drops_adult_flag_and_banned_genres() {
        let items = vec![
            media(1, false, &["Action", "Drama"]),
            media(2, true, &["Romance"]),
            media(3, false, &["HENTAI"]),
            media(4, false, &["Comedy", "Adult"]),
            media(5, false, &[]),
            media(6, false, &["Adulthood"]),
        ];

        assert_eq!(ids(&filter_safe(items)), vec![1, 5, 6]);
    }

    #[test]
    fn test_idempotent() {
        let items = vec![
            media(10, false, &["Mecha"]),
            media(11, true, &[]),
            media(12, false, &["hentai"]),
            media(13, false, &["Slice of Life"]),
        ];

        let once = filter_safe(items);
        let twice = filter_safe(once.clone());
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec![10, 13]);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_safe(Vec::new()).is_empty());
    }
}
