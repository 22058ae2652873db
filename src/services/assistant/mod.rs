use futures::future::join_all;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{
        CombinedResults, FeedbackAnalysis, MediaItem, MediaType, Suggestion, TitleDetails,
        WatchHistoryEntry,
    },
    services::gateway::MetadataGateway,
};

pub mod gemini;

pub use gemini::GeminiClient;

/// A generative text model answering one prompt at a time
///
/// Treated as best effort: every caller in this module degrades to an empty
/// result when the model is missing, unreachable or answers in the wrong shape.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Sends a prompt and returns the model's text answer
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    fn name(&self) -> &'static str;
}

/// Parses a model answer as JSON, tolerating a fenced code block around it
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> AppResult<T> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim())
        .map_err(|e| {
            AppError::UpstreamMalformed(format!("AI answer is not the expected JSON: {}", e))
        })
}

fn recommendations_prompt(history: &[WatchHistoryEntry]) -> String {
    let history = serde_json::to_string(history).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Based on user's watch history: {}, suggest 5 movies or TV shows with their TMDB IDs \
         that they might enjoy. Format the response as a JSON array of objects \
         with title and tmdbId.",
        history
    )
}

fn feedback_prompt(feedback: &str) -> String {
    format!(
        "Analyze this user feedback and extract sentiment, key points, and suggestions: \"{}\". \
         Return the analysis as a JSON object with sentiment (positive/negative/neutral), \
         keyPoints (array), and suggestions (array).",
        feedback
    )
}

async fn suggest(
    model: &dyn GenerativeModel,
    history: &[WatchHistoryEntry],
) -> AppResult<Vec<Suggestion>> {
    let answer = model.generate(&recommendations_prompt(history)).await?;
    parse_json_reply(&answer)
}

/// Titles the model suggests from a watch history, with their movie details
///
/// Suggestions whose details cannot be fetched are skipped.
pub async fn personalized_recommendations(
    model: Option<&dyn GenerativeModel>,
    gateway: &MetadataGateway,
    history: &[WatchHistoryEntry],
) -> Vec<TitleDetails> {
    let Some(model) = model else {
        tracing::warn!("Generative model not configured, returning no recommendations");
        return Vec::new();
    };

    let suggestions = match suggest(model, history).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            tracing::error!(error = %e, model = model.name(), "Error getting recommendations");
            return Vec::new();
        }
    };

    let lookups = suggestions.iter().filter_map(Suggestion::id).map(|id| async move {
        gateway
            .provider()
            .details(MediaType::Movie, &id)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, id = %id, "Skipping suggestion without details");
                e
            })
    });

    let details: Vec<TitleDetails> = join_all(lookups).await.into_iter().flatten().collect();

    tracing::info!(
        suggested = suggestions.len(),
        resolved = details.len(),
        "Personalized recommendations built"
    );

    details
}

/// Sentiment, key points and suggestions extracted from user feedback
pub async fn analyze_feedback(
    model: Option<&dyn GenerativeModel>,
    feedback: &str,
) -> AppResult<Option<FeedbackAnalysis>> {
    if feedback.trim().is_empty() {
        return Err(AppError::InvalidRequest("Feedback is required".to_string()));
    }

    let Some(model) = model else {
        tracing::error!("Missing generative model key");
        return Ok(None);
    };

    let analysis = async {
        let answer = model.generate(&feedback_prompt(feedback)).await?;
        parse_json_reply::<FeedbackAnalysis>(&answer)
    }
    .await;

    match analysis {
        Ok(analysis) => Ok(Some(analysis)),
        Err(e) => {
            tracing::error!(error = %e, model = model.name(), "Error analyzing feedback");
            Ok(None)
        }
    }
}

/// Free-text catalogue search that never fails on upstream errors
pub async fn natural_language_search(
    gateway: &MetadataGateway,
    query: &str,
) -> AppResult<Vec<MediaItem>> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidRequest("Query is required".to_string()));
    }

    match gateway.provider().search_multi(query).await {
        Ok(entries) => {
            let results = CombinedResults::merge(vec![entries]).results;
            tracing::debug!(query = %query, results = results.len(), "Natural language search");
            Ok(results)
        }
        Err(e) => {
            tracing::error!(error = %e, query = %query, "Error in search");
            Ok(Vec::new())
        }
    }
}
