mod audio_format;
mod cache_key;
mod segment;
mod transcription_artifact;

pub use audio_format::AudioFormat;
pub use cache_key::CacheKey;
pub use segment::Segment;
pub use transcription_artifact::TranscriptionArtifact;
