//! TMDB (The Movie Database) provider
//!
//! Every endpoint takes the API key as a query parameter. List endpoints are
//! paginated; only the first page is requested.

use crate::{
    error::{AppError, AppResult},
    models::{
        Credits, MediaItem, MediaType, RawPage, SearchEntry, SeasonDetails, TitleDetails,
    },
    services::providers::{MetadataProvider, TrendingWindow},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const APPENDED_RESOURCES: &str = "videos,credits,similar";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        http_client: HttpClient,
        api_key: String,
        api_url: String,
        language: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issues a GET and decodes the body, mapping every failure to an upstream error
    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("TMDB request to {} failed: {}", path, e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("TMDB body read failed: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "TMDB API returned status {} for {}: {}",
                status, path, body
            )));
        }

        decode(path, &body)
    }

    async fn list(&self, path: &str, params: &[(&str, &str)]) -> AppResult<RawPage> {
        let mut query = vec![("language", self.language.as_str()), ("page", "1")];
        query.extend_from_slice(params);
        self.get(path, &query).await
    }
}

/// Decodes a JSON body, reporting the path of the offending field on failure
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> AppResult<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        AppError::UpstreamMalformed(format!(
            "TMDB response for {} invalid at {}: {}",
            path,
            e.path(),
            e.inner()
        ))
    })
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_multi(&self, query: &str) -> AppResult<Vec<SearchEntry>> {
        let page = self
            .list("/search/multi", &[("query", query), ("include_adult", "false")])
            .await?;
        let entries = page.into_entries();

        tracing::info!(
            query = %query,
            results = entries.len(),
            provider = self.name(),
            "Multi search completed"
        );

        Ok(entries)
    }

    async fn trending(&self, window: TrendingWindow) -> AppResult<Vec<SearchEntry>> {
        let path = format!("/trending/all/{}", window.as_str());
        Ok(self.list(&path, &[]).await?.into_entries())
    }

    async fn search_person(&self, query: &str) -> AppResult<Vec<SearchEntry>> {
        let page = self.list("/search/person", &[("query", query)]).await?;
        Ok(page.into_entries())
    }

    async fn details(&self, media_type: MediaType, id: &str) -> AppResult<TitleDetails> {
        let path = format!("/{}/{}", media_type, id);
        self.get(&path, &[("language", self.language.as_str())]).await
    }

    async fn credits(&self, media_type: MediaType, id: &str) -> AppResult<Credits> {
        let path = format!("/{}/{}/credits", media_type, id);
        self.get(&path, &[]).await
    }

    async fn media_details(
        &self,
        media_type: MediaType,
        id: &str,
    ) -> AppResult<serde_json::Value> {
        let path = format!("/{}/{}", media_type, id);
        self.get(
            &path,
            &[
                ("language", self.language.as_str()),
                ("append_to_response", APPENDED_RESOURCES),
            ],
        )
        .await
    }

    async fn season_details(
        &self,
        series_id: &str,
        season_number: u32,
    ) -> AppResult<SeasonDetails> {
        let path = format!("/tv/{}/season/{}", series_id, season_number);
        self.get(&path, &[("language", self.language.as_str())]).await
    }

    async fn recommendations(
        &self,
        media_type: MediaType,
        id: &str,
    ) -> AppResult<Vec<MediaItem>> {
        let path = format!("/{}/{}/recommendations", media_type, id);
        Ok(with_media_type(self.list(&path, &[]).await?.into_items(), media_type))
    }

    async fn similar(&self, media_type: MediaType, id: &str) -> AppResult<Vec<MediaItem>> {
        let path = format!("/{}/{}/similar", media_type, id);
        Ok(with_media_type(self.list(&path, &[]).await?.into_items(), media_type))
    }

    async fn upcoming(&self) -> AppResult<Vec<MediaItem>> {
        Ok(self.list("/movie/upcoming", &[]).await?.into_items())
    }

    async fn top_rated(&self) -> AppResult<Vec<MediaItem>> {
        Ok(self.list("/movie/top_rated", &[]).await?.into_items())
    }

    async fn discover(&self, genre_id: u32) -> AppResult<Vec<MediaItem>> {
        let genre = genre_id.to_string();
        Ok(self
            .list("/discover/movie", &[("with_genres", genre.as_str())])
            .await?
            .into_items())
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

/// Per-title listings omit `media_type`; they always share the parent's kind
fn with_media_type(items: Vec<MediaItem>, media_type: MediaType) -> Vec<MediaItem> {
    items
        .into_iter()
        .map(|item| MediaItem { media_type, ..item })
        .collect()
}
