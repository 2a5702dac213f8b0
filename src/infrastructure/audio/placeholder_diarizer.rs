use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{DiarizationError, SpeakerDiarizer};
use crate::application::services::speaker_tag;
use crate::domain::Segment;

const PLACEHOLDER_SPEAKERS: usize = 3;

/// Stand-in for a neural diarization model. Cycles three tags by segment
/// position and never looks at the audio; swap in a real integration behind
/// [`SpeakerDiarizer`] to get actual speaker attribution.
pub struct PlaceholderDiarizer;

#[async_trait]
impl SpeakerDiarizer for PlaceholderDiarizer {
    async fn speaker_for(
        &self,
        _audio_path: &Path,
        _segment: &Segment,
        index: usize,
    ) -> Result<String, DiarizationError> {
        Ok(speaker_tag(index % PLACEHOLDER_SPEAKERS + 1))
    }
}
