use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ErrorResponse,
    models::{MediaItem, MediaType, SeasonDetails},
    routes::AppState,
    services::assistant,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    limit: Option<usize>,
}

/// Handler for free-text search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ErrorResponse> {
    let results = assistant::natural_language_search(&state.gateway, &params.q)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(SearchResponse { results }))
}

/// Handler for a title's details with videos, credits and similar titles
pub async fn details(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(MediaType, String)>,
) -> Result<Json<serde_json::Value>, ErrorResponse> {
    let details = state
        .gateway
        .media_details(media_type, &id)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(details))
}

/// Handler for one season of a series
pub async fn season(
    State(state): State<AppState>,
    Path((id, season_number)): Path<(String, u32)>,
) -> Result<Json<SeasonDetails>, ErrorResponse> {
    let season = state
        .gateway
        .season_details(&id, season_number)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(season))
}

/// Handler for titles related to a given one
pub async fn related(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(MediaType, String)>,
    Query(params): Query<RelatedQuery>,
) -> Result<Json<Vec<MediaItem>>, ErrorResponse> {
    let related = state
        .gateway
        .related(media_type, &id, params.limit)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(related))
}
