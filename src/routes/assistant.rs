use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::ErrorResponse,
    models::{FeedbackAnalysis, TitleDetails, WatchHistoryEntry},
    routes::AppState,
    services::assistant,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub history: Vec<WatchHistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<TitleDetails>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub analysis: Option<FeedbackAnalysis>,
}

/// Handler for personalized recommendations
pub async fn recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Json<RecommendationResponse> {
    let recommendations = assistant::personalized_recommendations(
        state.model.as_deref(),
        &state.gateway,
        &request.history,
    )
    .await;
    Json(RecommendationResponse { recommendations })
}

/// Handler for feedback analysis
pub async fn feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ErrorResponse> {
    let analysis = assistant::analyze_feedback(state.model.as_deref(), &request.feedback)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(FeedbackResponse { analysis }))
}
