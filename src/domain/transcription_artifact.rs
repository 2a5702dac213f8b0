use serde::{Deserialize, Serialize};

use super::Segment;

/// Stored and returned unit: the full transcript plus its segments in engine order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionArtifact {
    pub text: String,
    pub segments: Vec<Segment>,
}

impl TranscriptionArtifact {
    pub fn new(text: String, segments: Vec<Segment>) -> Self {
        Self { text, segments }
    }

    pub fn has_speakers(&self) -> bool {
        self.segments.iter().any(|s| s.speaker.is_some())
    }
}
