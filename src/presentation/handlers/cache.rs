use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct ClearCacheResponse {
    pub status: String,
    pub files_deleted: usize,
    pub message: String,
}

#[tracing::instrument(skip(state))]
pub async fn clear_cache_handler(State(state): State<AppState>) -> Response {
    match state.transcription_service.clear_cache().await {
        Ok(files_deleted) => (
            StatusCode::OK,
            Json(ClearCacheResponse {
                status: "success".to_string(),
                files_deleted,
                message: format!("Cleared {} cached transcription(s)", files_deleted),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to clear cache");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to clear cache: {}", e),
            )
        }
    }
}
