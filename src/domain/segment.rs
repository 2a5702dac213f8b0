use serde::{Deserialize, Serialize};

/// A timed span of recognised speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub speaker: Option<String>,
}

impl Segment {
    /// Builds an unlabeled segment, trimming the text and clamping `end` to `start`.
    pub fn new(start: f64, end: f64, text: &str) -> Self {
        Self {
            start,
            end: end.max(start),
            text: text.trim().to_string(),
            speaker: None,
        }
    }
}
