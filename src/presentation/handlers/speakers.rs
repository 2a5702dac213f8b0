use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::application::services::LabelingStrategy;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct SpeakerInfoResponse {
    pub speaker_diarization_available: bool,
    pub active_method: &'static str,
    pub methods: SpeakerMethods,
    pub recommendation: &'static str,
}

#[derive(Serialize)]
pub struct SpeakerMethods {
    pub simple: SpeakerMethod,
    pub advanced: SpeakerMethod,
}

#[derive(Serialize)]
pub struct SpeakerMethod {
    pub available: bool,
    pub description: &'static str,
    pub accuracy: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<&'static str>,
}

pub async fn speaker_info_handler(State(state): State<AppState>) -> Json<SpeakerInfoResponse> {
    let strategy = state.transcription_service.speaker_strategy();

    Json(SpeakerInfoResponse {
        speaker_diarization_available: true,
        active_method: strategy.as_str(),
        methods: SpeakerMethods {
            simple: SpeakerMethod {
                available: true,
                description: "Basic speaker detection based on pause patterns",
                accuracy: "Low to Medium",
                requirements: None,
            },
            advanced: SpeakerMethod {
                available: strategy == LabelingStrategy::Advanced,
                description: "Per-segment labels from a configured diarization collaborator",
                accuracy: "Depends on the configured collaborator",
                requirements: Some("A diarization provider enabled in configuration"),
            },
        },
        recommendation: "Use advanced method for better accuracy, simple method for faster processing",
    })
}
