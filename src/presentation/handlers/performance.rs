use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct PerformanceInfoResponse {
    pub model: String,
    pub optimizations: Optimizations,
    pub cache_stats: CacheStatsResponse,
    pub recommendations: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct Optimizations {
    pub caching_enabled: bool,
    pub fp16_disabled: bool,
    pub beam_size: u32,
    pub best_of: u32,
    pub temperature: f32,
}

#[derive(Serialize)]
pub struct CacheStatsResponse {
    pub cached_files: usize,
    pub cache_size_mb: f64,
    pub cache_directory: String,
}

#[tracing::instrument(skip(state))]
pub async fn performance_info_handler(State(state): State<AppState>) -> Response {
    let service = &state.transcription_service;

    let stats = match service.cache_stats().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read cache statistics");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read cache statistics: {}", e),
            );
        }
    };

    let decoding = service.decoding_options();

    Json(PerformanceInfoResponse {
        model: state.model_name.clone(),
        optimizations: Optimizations {
            caching_enabled: true,
            fp16_disabled: !decoding.fp16,
            beam_size: decoding.beam_size,
            best_of: decoding.best_of,
            temperature: decoding.temperature,
        },
        cache_stats: CacheStatsResponse {
            cached_files: stats.entries,
            cache_size_mb: (stats.size_mb() * 100.0).round() / 100.0,
            cache_directory: service.cache_location(),
        },
        recommendations: vec![
            "Cache will speed up repeated transcriptions of the same files",
            "Raise processing.max_concurrent_transcriptions only if the engine handles parallel requests",
            "Clear cache periodically to free up disk space",
        ],
    })
    .into_response()
}
