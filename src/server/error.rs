//! Mapping of relay failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::upstream::UpstreamError;

/// Failures surfaced before the response body starts streaming.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("OpenAI API key not configured. Please set OPENAI_API_KEY environment variable.")]
    MissingApiKey,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        error!(error = %detail, "Chat request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { detail }),
        )
            .into_response()
    }
}
