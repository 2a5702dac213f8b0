mod speaker_diarizer;
mod transcript_cache;
mod transcription_engine;

pub use speaker_diarizer::{DiarizationError, SpeakerDiarizer};
pub use transcript_cache::{CacheError, CacheStats, TranscriptCache};
pub use transcription_engine::{
    DecodingOptions, RawSegment, RawTranscript, TranscriptionEngine, TranscriptionError,
};
