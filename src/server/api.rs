//! HTTP API.
//!
//! - POST /api/chat
//! - GET /api/health

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::config::RelaySettings;
use crate::server::error::ApiError;
use crate::server::streaming::relay_body;
use crate::upstream::{CompletionClient, CompletionRequest};

/// Application state shared across handlers.
pub struct AppState {
    pub client: Arc<dyn CompletionClient>,
    pub settings: RelaySettings,
}

impl AppState {
    pub fn new(client: Arc<dyn CompletionClient>, settings: RelaySettings) -> Self {
        Self { client, settings }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// Any origin, method and header, with credentials.
///
/// A literal `*` cannot be combined with credentials, so the request's own
/// values are echoed back instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

// ─── Request/Response Types ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub developer_message: String,
    pub user_message: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    let api_key = state.settings.api_key().ok_or(ApiError::MissingApiKey)?;
    let model = state.settings.resolve_model(req.model.as_deref());

    info!(
        request_id = %request_id,
        model = %model,
        developer_bytes = req.developer_message.len(),
        user_bytes = req.user_message.len(),
        "Chat request"
    );

    let request = CompletionRequest::new(api_key, model, req.developer_message, req.user_message);
    let fragments = state.client.stream_chat(request).await?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(relay_body(fragments, request_id)),
    )
        .into_response())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
