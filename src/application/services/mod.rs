mod keyed_mutex;
mod speaker_labeler;
mod transcription_service;

pub use keyed_mutex::{KeyedGuard, KeyedMutex};
pub use speaker_labeler::{
    LabelingStrategy, SpeakerLabeler, pause_heuristic_tags, round_robin_tag, speaker_tag,
};
pub use transcription_service::{
    ProcessingConfig, TranscriptionOutcome, TranscriptionRequest, TranscriptionService,
    TranscriptionServiceError,
};
