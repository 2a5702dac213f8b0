use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Deserialize;

use crate::application::services::{TranscriptionRequest, TranscriptionServiceError};
use crate::presentation::state::AppState;

use super::error_response::error_response;

pub const CACHE_STATUS_HEADER: &str = "x-cache";
pub const PROCESSING_TIME_HEADER: &str = "x-processing-time";

const FILE_FIELD: &str = "file";
const SPEAKER_FLAG_FIELD: &str = "enable_speaker_diarization";

#[derive(Debug, Default, Deserialize)]
pub struct TranscribeParams {
    pub enable_speaker_diarization: Option<bool>,
}

#[tracing::instrument(skip(state, params, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    Query(params): Query<TranscribeParams>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<(String, Bytes)> = None;
    let mut form_flag: Option<bool> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(e.status(), format!("Failed to read multipart: {}", e));
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().unwrap_or("unknown").to_string();
                match field.bytes().await {
                    Ok(data) => upload = Some((filename, data)),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read file bytes");
                        return error_response(
                            e.status(),
                            format!("Failed to read file: {}", e),
                        );
                    }
                }
            }
            Some(SPEAKER_FLAG_FIELD) => {
                let raw = match field.text().await {
                    Ok(raw) => raw,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read speaker flag");
                        return error_response(
                            e.status(),
                            format!("Failed to read {}: {}", SPEAKER_FLAG_FIELD, e),
                        );
                    }
                };
                match parse_flag(&raw) {
                    Some(flag) => form_flag = Some(flag),
                    None => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Invalid boolean for {}: {}", SPEAKER_FLAG_FIELD, raw),
                        );
                    }
                }
            }
            other => tracing::debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let Some((filename, audio)) = upload else {
        tracing::warn!("Transcription request with no file");
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    let want_speakers = form_flag
        .or(params.enable_speaker_diarization)
        .unwrap_or(false);

    tracing::info!(
        filename = %filename,
        bytes = audio.len(),
        want_speakers,
        "Processing file"
    );

    let request = TranscriptionRequest {
        audio,
        filename: filename.clone(),
        want_speakers,
    };

    match state.transcription_service.transcribe(request).await {
        Ok(outcome) => {
            let mut response = (StatusCode::OK, Json(outcome.artifact)).into_response();
            let headers = response.headers_mut();
            headers.insert(
                CACHE_STATUS_HEADER,
                HeaderValue::from_static(if outcome.cache_hit { "hit" } else { "miss" }),
            );
            if let Ok(value) =
                HeaderValue::from_str(&format!("{:.3}", outcome.elapsed.as_secs_f64()))
            {
                headers.insert(PROCESSING_TIME_HEADER, value);
            }
            response
        }
        Err(e @ TranscriptionServiceError::UnsupportedFormat { .. }) => {
            tracing::warn!(filename = %filename, "Unsupported file format");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ TranscriptionServiceError::EngineUnavailable) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        Err(e) => {
            tracing::error!(filename = %filename, error = %e, "Error processing audio file");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing audio file: {}", e),
            )
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
