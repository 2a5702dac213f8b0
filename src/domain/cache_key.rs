use std::fmt;

use sha2::{Digest, Sha256};

/// Content-addressed identity of a transcription request.
///
/// Derived from the SHA-256 of the uploaded bytes and the speaker flag, so the
/// same audio maps to the same entry across restarts and hosts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(content: &[u8], want_speakers: bool) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(format!("{:x}_{}", hasher.finalize(), want_speakers))
    }

    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
