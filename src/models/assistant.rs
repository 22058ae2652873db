use serde::{Deserialize, Serialize};

use super::MediaType;

/// One title the user has watched, as sent by the front end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub watched_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A title suggested by the generative model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    #[serde(default)]
    pub tmdb_id: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Structured reading of free-text user feedback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalysis {
    pub sentiment: Sentiment,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Suggestion {
    /// The suggested TMDB ID in string form; models return it as a number or a string
    pub fn id(&self) -> Option<String> {
        match &self.tmdb_id {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}
