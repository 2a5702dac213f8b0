use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{EngineProvider, EngineSettings};

use super::openai_whisper_engine::OpenAiWhisperEngine;

/// Provisions the recognition engine at start-up. An error here means the
/// service runs without an engine and reports the model as not loaded.
pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &EngineSettings,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match settings.provider {
            EngineProvider::OpenAi => {
                let key = settings
                    .api_key
                    .clone()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        TranscriptionError::ModelLoadFailed(
                            "API key required for OpenAI Whisper".to_string(),
                        )
                    })?;
                let engine = OpenAiWhisperEngine::new(
                    Some(key),
                    settings.base_url.clone(),
                    Some(settings.model.clone()),
                );
                Ok(Arc::new(engine))
            }
            EngineProvider::WhisperServer => {
                let base_url = settings.base_url.clone().ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed(
                        "base_url required for a self-hosted whisper server".to_string(),
                    )
                })?;
                let engine = OpenAiWhisperEngine::new(
                    settings.api_key.clone().filter(|k| !k.is_empty()),
                    Some(base_url),
                    Some(settings.model.clone()),
                );
                Ok(Arc::new(engine))
            }
            EngineProvider::Disabled => Err(TranscriptionError::ModelLoadFailed(
                "transcription engine disabled by configuration".to_string(),
            )),
        }
    }
}
