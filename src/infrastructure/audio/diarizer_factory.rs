use std::sync::Arc;

use crate::application::ports::SpeakerDiarizer;
use crate::presentation::config::{DiarizationProvider, DiarizationSettings};

use super::placeholder_diarizer::PlaceholderDiarizer;

pub struct DiarizerFactory;

impl DiarizerFactory {
    /// `None` selects the pause heuristic.
    pub fn create(settings: &DiarizationSettings) -> Option<Arc<dyn SpeakerDiarizer>> {
        match settings.provider {
            DiarizationProvider::None => None,
            DiarizationProvider::Placeholder => {
                tracing::warn!(
                    "Placeholder diarizer enabled: speaker tags cycle by position, not by voice"
                );
                Some(Arc::new(PlaceholderDiarizer))
            }
        }
    }
}
