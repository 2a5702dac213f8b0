use async_trait::async_trait;

use crate::domain::{CacheKey, TranscriptionArtifact};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
}

impl CacheStats {
    pub fn size_mb(&self) -> f64 {
        self.total_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Key to artifact store. A missing entry is `Ok(None)`; callers decide how
/// soft the other failures are.
#[async_trait]
pub trait TranscriptCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<TranscriptionArtifact>, CacheError>;

    async fn put(
        &self,
        key: &CacheKey,
        artifact: &TranscriptionArtifact,
    ) -> Result<(), CacheError>;

    /// Removes every entry and returns how many were deleted.
    async fn clear(&self) -> Result<usize, CacheError>;

    async fn stats(&self) -> Result<CacheStats, CacheError>;

    fn location(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("read failed: {0}")]
    Read(String),
    #[error("corrupt entry {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("write failed: {0}")]
    Write(String),
    #[error("delete failed: {0}")]
    Delete(String),
    #[error("list failed: {0}")]
    List(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
