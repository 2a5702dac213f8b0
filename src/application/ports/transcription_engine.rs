use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

/// Fixed decoding parameters handed to the engine on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodingOptions {
    pub fp16: bool,
    pub beam_size: u32,
    pub best_of: u32,
    pub temperature: f32,
    pub compression_ratio_threshold: f32,
    pub logprob_threshold: f32,
    pub no_speech_threshold: f32,
}

impl DecodingOptions {
    /// Greedy single-candidate decoding at temperature zero, full precision.
    pub const fn deterministic() -> Self {
        Self {
            fp16: false,
            beam_size: 1,
            best_of: 1,
            temperature: 0.0,
            compression_ratio_threshold: 2.4,
            logprob_threshold: -1.0,
            no_speech_threshold: 0.6,
        }
    }
}

impl Default for DecodingOptions {
    fn default() -> Self {
        Self::deterministic()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTranscript {
    pub text: String,
    pub segments: Vec<RawSegment>,
}

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &DecodingOptions,
    ) -> Result<RawTranscript, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid engine response: {0}")]
    InvalidResponse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
