use std::path::Path;
use std::sync::Arc;

use crate::application::ports::SpeakerDiarizer;
use crate::domain::Segment;

/// Gap between segments, in seconds, treated as a probable change of speaker.
const TURN_PAUSE_SECS: f64 = 2.0;
const CADENCE_AFTER_PAUSE: usize = 3;
const CADENCE_CONTINUOUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelingStrategy {
    /// Per-segment tags from a diarization collaborator.
    Advanced,
    /// Deterministic pause-pattern heuristic.
    PauseHeuristic,
}

impl LabelingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelingStrategy::Advanced => "advanced",
            LabelingStrategy::PauseHeuristic => "simple",
        }
    }
}

/// Assigns speaker tags to engine segments.
///
/// Holds no per-request state: the output depends only on the segments and on
/// whether a diarizer was supplied at construction.
pub struct SpeakerLabeler {
    diarizer: Option<Arc<dyn SpeakerDiarizer>>,
}

impl SpeakerLabeler {
    pub fn new(diarizer: Option<Arc<dyn SpeakerDiarizer>>) -> Self {
        Self { diarizer }
    }

    pub fn pause_heuristic() -> Self {
        Self::new(None)
    }

    pub fn strategy(&self) -> LabelingStrategy {
        match self.diarizer {
            Some(_) => LabelingStrategy::Advanced,
            None => LabelingStrategy::PauseHeuristic,
        }
    }

    /// Tags every segment in place. Order and count are preserved.
    pub async fn label(&self, audio_path: &Path, segments: &mut [Segment]) {
        let Some(diarizer) = &self.diarizer else {
            let tags = pause_heuristic_tags(segments);
            for (segment, tag) in segments.iter_mut().zip(tags) {
                segment.speaker = Some(tag);
            }
            return;
        };

        for (index, segment) in segments.iter_mut().enumerate() {
            let tag = match diarizer.speaker_for(audio_path, segment, index).await {
                Ok(tag) => tag,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        segment = index,
                        "Advanced speaker diarization failed, using round-robin tag"
                    );
                    round_robin_tag(index)
                }
            };
            segment.speaker = Some(tag);
        }
    }
}

pub fn speaker_tag(number: usize) -> String {
    format!("SPEAKER_{}", number)
}

/// Two-way alternation used when the diarizer fails on a segment.
pub fn round_robin_tag(index: usize) -> String {
    speaker_tag(index % 2 + 1)
}

/// Approximate speaker turns from pauses between consecutive segments.
///
/// Segment 0 is always `SPEAKER_1`. After a pause longer than two seconds
/// tags cycle every three segments, otherwise every two.
pub fn pause_heuristic_tags(segments: &[Segment]) -> Vec<String> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if i == 0 {
                return speaker_tag(1);
            }
            let pause = segment.start - segments[i - 1].end;
            let cadence = if pause > TURN_PAUSE_SECS {
                CADENCE_AFTER_PAUSE
            } else {
                CADENCE_CONTINUOUS
            };
            speaker_tag((i / cadence) % 2 + 1)
        })
        .collect()
}
