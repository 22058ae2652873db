use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::HashSet, fmt::Display, str::FromStr};

pub mod assistant;
pub mod details;

pub use assistant::{FeedbackAnalysis, Sentiment, Suggestion, WatchHistoryEntry};
pub use details::{CastMember, Credits, DetailsRecord, Episode, SeasonDetails, TitleDetails};

/// Kind of displayable catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(format!("Unknown media type: {}", other)),
        }
    }
}

/// A movie or TV show as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Provider ID, always in string form
    pub id: String,
    pub title: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

impl MediaItem {
    /// Identity of the item; a movie and a show may share the same numeric ID
    pub fn key(&self) -> MediaKey {
        MediaKey {
            media_type: self.media_type,
            id: self.id.clone(),
        }
    }
}

/// Media-type-qualified identity used for deduplication
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub media_type: MediaType,
    pub id: String,
}

impl Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.media_type, self.id)
    }
}

/// Normalized search result: either a displayable title or a person with their known-for titles
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEntry {
    Title(MediaItem),
    Person { name: String, known_for: Vec<MediaItem> },
}

impl SearchEntry {
    /// Displayable items carried by this entry
    pub fn into_items(self) -> Vec<MediaItem> {
        match self {
            SearchEntry::Title(item) => vec![item],
            SearchEntry::Person { known_for, .. } => known_for,
        }
    }
}

/// Which upstream listings a search fans out to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub include_trending: bool,
    pub search_person: bool,
}

/// Merged and deduplicated result of one search
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CombinedResults {
    pub results: Vec<MediaItem>,
}

impl CombinedResults {
    /// Flattens person entries and keeps the first occurrence of each media key
    pub fn merge(batches: Vec<Vec<SearchEntry>>) -> Self {
        Self {
            results: dedup_items(
                batches
                    .into_iter()
                    .flatten()
                    .flat_map(SearchEntry::into_items),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Keeps the first item seen for each media-type-qualified ID, preserving order
pub fn dedup_items(items: impl IntoIterator<Item = MediaItem>) -> Vec<MediaItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.key()))
        .collect()
}

// ============================================================================
// TMDB wire types
// ============================================================================

/// Raw list entry as sent by TMDB; may describe a movie, a show or a person
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub known_for: Option<Vec<RawEntry>>,
}

/// Paginated TMDB listing
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub results: Vec<RawEntry>,
}

impl RawPage {
    pub fn into_entries(self) -> Vec<SearchEntry> {
        self.results
            .into_iter()
            .filter_map(RawEntry::normalize)
            .collect()
    }

    pub fn into_items(self) -> Vec<MediaItem> {
        self.into_entries()
            .into_iter()
            .flat_map(SearchEntry::into_items)
            .collect()
    }
}

/// Provider IDs arrive as numbers or strings; both map to the same string form
fn coerce_id(id: &Value) -> Option<String> {
    match id {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl RawEntry {
    /// Converts a provider entry into a typed one, or `None` if it cannot be displayed
    pub fn normalize(self) -> Option<SearchEntry> {
        let is_person = match self.media_type.as_deref() {
            Some("person") => true,
            Some(_) => false,
            None => self.known_for.is_some(),
        };

        if is_person {
            let known_for = self
                .known_for
                .unwrap_or_default()
                .into_iter()
                .filter_map(RawEntry::normalize_title)
                .collect();
            return Some(SearchEntry::Person {
                name: self.name.unwrap_or_default(),
                known_for,
            });
        }

        self.normalize_title().map(SearchEntry::Title)
    }

    fn normalize_title(self) -> Option<MediaItem> {
        let media_type = match self.media_type.as_deref() {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            Some(_) => return None,
            None if self.title.is_some() => MediaType::Movie,
            None if self.name.is_some() => MediaType::Tv,
            None => return None,
        };

        let id = coerce_id(&self.id)?;
        let title = non_empty(self.title).or(non_empty(self.name))?;

        Some(MediaItem {
            id,
            title,
            media_type,
            release_date: non_empty(self.release_date).or(non_empty(self.first_air_date)),
            vote_average: self.vote_average,
            overview: non_empty(self.overview),
            popularity: self.popularity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> Option<SearchEntry> {
        serde_json::from_value::<RawEntry>(value).unwrap().normalize()
    }

    fn item(id: &str, media_type: MediaType) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            title: format!("Title {}", id),
            media_type,
            release_date: None,
            vote_average: None,
            overview: None,
            popularity: None,
        }
    }

    #[test]
    fn test_movie_entry_normalized() {
        let normalized = entry(json!({
            "id": 550,
            "media_type": "movie",
            "title": "Fight Club",
            "release_date": "1999-10-15",
            "vote_average": 8.4,
            "overview": "An insomniac office worker..."
        }));

        match normalized {
            Some(SearchEntry::Title(item)) => {
                assert_eq!(item.id, "550");
                assert_eq!(item.media_type, MediaType::Movie);
                assert_eq!(item.title, "Fight Club");
                assert_eq!(item.release_date.as_deref(), Some("1999-10-15"));
                assert_eq!(item.vote_average, Some(8.4));
            }
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_tv_entry_uses_name_and_first_air_date() {
        let normalized = entry(json!({
            "id": "1399",
            "media_type": "tv",
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "release_date": ""
        }));

        let Some(SearchEntry::Title(item)) = normalized else {
            panic!("expected a title");
        };
        assert_eq!(item.id, "1399");
        assert_eq!(item.media_type, MediaType::Tv);
        assert_eq!(item.title, "Game of Thrones");
        assert_eq!(item.release_date.as_deref(), Some("2011-04-17"));
    }

    #[test]
    fn test_media_type_inferred_when_missing() {
        let Some(SearchEntry::Title(movie)) = entry(json!({ "id": 1, "title": "Upcoming" })) else {
            panic!("expected a movie");
        };
        assert_eq!(movie.media_type, MediaType::Movie);

        let Some(SearchEntry::Title(show)) = entry(json!({ "id": 2, "name": "A Show" })) else {
            panic!("expected a show");
        };
        assert_eq!(show.media_type, MediaType::Tv);
    }

    #[test]
    fn test_entry_without_title_or_name_dropped() {
        assert_eq!(entry(json!({ "id": 3, "media_type": "movie" })), None);
        assert_eq!(entry(json!({ "id": 3, "overview": "nothing to show" })), None);
    }

    #[test]
    fn test_entry_without_id_dropped() {
        assert_eq!(entry(json!({ "title": "No ID" })), None);
    }

    #[test]
    fn test_person_entry_keeps_known_for_titles() {
        let normalized = entry(json!({
            "id": 287,
            "name": "Brad Pitt",
            "known_for": [
                { "id": 550, "media_type": "movie", "title": "Fight Club" },
                { "id": 1422, "media_type": "tv", "name": "The Tonight Show" },
                { "id": 9, "media_type": "movie" }
            ]
        }));

        match normalized {
            Some(SearchEntry::Person { name, known_for }) => {
                assert_eq!(name, "Brad Pitt");
                assert_eq!(known_for.len(), 2);
                assert_eq!(
                    known_for[0].key(),
                    MediaKey {
                        media_type: MediaType::Movie,
                        id: "550".to_string()
                    }
                );
                assert_eq!(known_for[1].media_type, MediaType::Tv);
            }
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_merge_flattens_people_and_dedups_by_media_key() {
        let batches = vec![
            vec![
                SearchEntry::Title(item("550", MediaType::Movie)),
                SearchEntry::Title(item("550", MediaType::Tv)),
            ],
            vec![
                SearchEntry::Person {
                    name: "Someone".to_string(),
                    known_for: vec![item("550", MediaType::Movie), item("13", MediaType::Movie)],
                },
            ],
        ];

        let merged = CombinedResults::merge(batches);
        let keys: Vec<String> = merged.results.iter().map(|i| i.key().to_string()).collect();
        assert_eq!(keys, vec!["movie-550", "tv-550", "movie-13"]);
    }

    #[test]
    fn test_media_type_from_str() {
        assert_eq!("movie".parse::<MediaType>(), Ok(MediaType::Movie));
        assert_eq!("tv".parse::<MediaType>(), Ok(MediaType::Tv));
        assert!("person".parse::<MediaType>().is_err());
    }
}
