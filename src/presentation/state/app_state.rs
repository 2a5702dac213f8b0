use std::sync::Arc;

use crate::application::services::TranscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    /// Engine model name reported by `/performance/info`.
    pub model_name: String,
    pub max_upload_bytes: usize,
}
