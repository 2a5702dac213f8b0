use std::path::Path;

use async_trait::async_trait;

use crate::domain::Segment;

/// Attributes a single segment of a staged recording to a speaker.
#[async_trait]
pub trait SpeakerDiarizer: Send + Sync {
    async fn speaker_for(
        &self,
        audio_path: &Path,
        segment: &Segment,
        index: usize,
    ) -> Result<String, DiarizationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DiarizationError {
    #[error("diarization failed: {0}")]
    Failed(String),
}
