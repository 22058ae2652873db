//! Media metadata provider abstraction
//!
//! The gateway talks to the catalogue through this trait so the upstream can be
//! swapped (or mocked) without touching caching, merging or formatting. Payloads
//! are normalized inside each implementation; callers never see raw provider JSON
//! except through [`MetadataProvider::media_details`], which is a passthrough.

use crate::{
    error::AppResult,
    models::{Credits, MediaItem, MediaType, SearchEntry, SeasonDetails, TitleDetails},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Time window for trending listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingWindow {
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Multi-type text search (movies, shows and people)
    async fn search_multi(&self, query: &str) -> AppResult<Vec<SearchEntry>>;

    /// Trending movies and shows
    async fn trending(&self, window: TrendingWindow) -> AppResult<Vec<SearchEntry>>;

    /// Person search; each person carries their known-for titles
    async fn search_person(&self, query: &str) -> AppResult<Vec<SearchEntry>>;

    /// Detail record for one title
    async fn details(&self, media_type: MediaType, id: &str) -> AppResult<TitleDetails>;

    /// Cast of one title
    async fn credits(&self, media_type: MediaType, id: &str) -> AppResult<Credits>;

    /// Details with videos, credits and similar titles appended
    async fn media_details(&self, media_type: MediaType, id: &str)
        -> AppResult<serde_json::Value>;

    /// One season of a series
    async fn season_details(&self, series_id: &str, season_number: u32)
        -> AppResult<SeasonDetails>;

    /// Titles the provider recommends for the given one
    async fn recommendations(&self, media_type: MediaType, id: &str)
        -> AppResult<Vec<MediaItem>>;

    /// Titles similar to the given one
    async fn similar(&self, media_type: MediaType, id: &str) -> AppResult<Vec<MediaItem>>;

    /// Upcoming movie releases
    async fn upcoming(&self) -> AppResult<Vec<MediaItem>>;

    /// Top rated movies
    async fn top_rated(&self) -> AppResult<Vec<MediaItem>>;

    /// Movies in one genre
    async fn discover(&self, genre_id: u32) -> AppResult<Vec<MediaItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
