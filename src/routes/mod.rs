use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    cache::ResponseCache,
    config::Config,
    error::{AppError, ErrorResponse},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        assistant::{GeminiClient, GenerativeModel},
        providers::TmdbProvider,
        CacheTtls, MetadataGateway,
    },
};

pub mod assistant;
pub mod browse;
pub mod chat;
pub mod media;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<MetadataGateway>,
    pub model: Option<Arc<dyn GenerativeModel>>,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(
        gateway: Arc<MetadataGateway>,
        model: Option<Arc<dyn GenerativeModel>>,
        expose_error_details: bool,
    ) -> Self {
        Self {
            gateway,
            model,
            expose_error_details,
        }
    }

    /// Wires the TMDB provider, the response cache and the optional generative model
    pub fn from_config(config: &Config) -> Self {
        let http_client = reqwest::Client::new();

        let provider = TmdbProvider::new(
            http_client.clone(),
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
        );
        let gateway = MetadataGateway::new(
            Arc::new(provider),
            Arc::new(ResponseCache::default()),
            CacheTtls {
                search: config.search_cache_ttl_secs,
                details: config.details_cache_ttl_secs,
            },
        );

        let model = config.google_ai_key.clone().map(|key| {
            Arc::new(GeminiClient::new(http_client, key, config.google_ai_url.clone()))
                as Arc<dyn GenerativeModel>
        });

        Self::new(Arc::new(gateway), model, config.expose_error_details())
    }

    /// Converts an error into a response, honouring the details policy
    pub fn fail(&self, error: AppError) -> ErrorResponse {
        error.with_details(self.expose_error_details)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum_middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat).fallback(chat::method_not_allowed))
        .route("/search", get(media::search))
        .route("/media/:media_type/:id", get(media::details))
        .route("/tv/:id/season/:season", get(media::season))
        .route("/related/:media_type/:id", get(media::related))
        .route("/browse", get(browse::rows))
        .route("/browse/:row", get(browse::row))
        .route("/recommendations", post(assistant::recommendations))
        .route("/feedback", post(assistant::feedback))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
