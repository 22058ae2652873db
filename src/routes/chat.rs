use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::ErrorResponse, middleware::RequestId, routes::AppState, services::chat as chat_service,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Handler for the chat endpoint
///
/// A body that cannot be read as `{ message }` is treated like an empty message.
pub async fn chat(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ErrorResponse> {
    let message = match payload {
        Ok(Json(request)) => request.message.unwrap_or_default(),
        Err(rejection) => {
            tracing::warn!(request_id = %request_id, error = %rejection, "Unreadable chat request");
            String::new()
        }
    };

    tracing::info!(
        request_id = %request_id,
        message_len = message.len(),
        "Processing chat message"
    );

    let reply = chat_service::respond(&state.gateway, &message)
        .await
        .map_err(|e| state.fail(e))?;

    tracing::info!(request_id = %request_id, reply_len = reply.len(), "Chat reply sent");

    Ok(Json(ChatResponse { reply }))
}

/// Any method other than POST on the chat endpoint
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
