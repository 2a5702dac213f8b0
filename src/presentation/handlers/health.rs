use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::LabelingStrategy;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub speaker_diarization_available: bool,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = &state.transcription_service;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            model_loaded: service.is_engine_ready(),
            speaker_diarization_available: service.speaker_strategy()
                == LabelingStrategy::Advanced,
        }),
    )
}
