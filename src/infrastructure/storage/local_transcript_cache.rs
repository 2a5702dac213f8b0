use std::path::PathBuf;
use std::sync::Arc;

use futures::TryStreamExt;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectMeta, ObjectStore, PutPayload};
use serde::{Deserialize, Serialize};

use crate::application::ports::{CacheError, CacheStats, TranscriptCache};
use crate::domain::{CacheKey, TranscriptionArtifact};

const ENTRY_SUFFIX: &str = ".json";
const ENTRY_VERSION: u32 = 1;

#[derive(Serialize)]
struct EntryRef<'a> {
    version: u32,
    #[serde(flatten)]
    artifact: &'a TranscriptionArtifact,
}

/// Entries written before versioning have no `version` field and read as 0.
#[derive(Deserialize)]
struct StoredEntry {
    #[serde(default)]
    version: u32,
    #[serde(flatten)]
    artifact: TranscriptionArtifact,
}

#[derive(Deserialize)]
struct StoredVersion {
    #[serde(default)]
    version: u32,
}

/// One JSON file per key in a flat directory.
///
/// Writes go through `LocalFileSystem::put`, which stages to a sibling file and
/// renames it into place, so readers never observe a partial entry. An entry
/// written in a newer format reads as a miss and is never overwritten.
pub struct LocalTranscriptCache {
    inner: Arc<LocalFileSystem>,
    root: PathBuf,
}

impl LocalTranscriptCache {
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&root)?;
        let fs = LocalFileSystem::new_with_prefix(&root)
            .map_err(|e| CacheError::Read(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            root,
        })
    }

    async fn entries(&self) -> Result<Vec<ObjectMeta>, CacheError> {
        let listed: Vec<ObjectMeta> = self
            .inner
            .list(None)
            .try_collect()
            .await
            .map_err(|e| CacheError::List(e.to_string()))?;

        Ok(listed.into_iter().filter(is_entry).collect())
    }

    /// Format version of the entry at `path`, if one exists and parses.
    async fn stored_version(&self, path: &StorePath) -> Option<u32> {
        let bytes = self.inner.get(path).await.ok()?.bytes().await.ok()?;
        serde_json::from_slice::<StoredVersion>(&bytes)
            .ok()
            .map(|entry| entry.version)
    }
}

fn entry_path(key: &CacheKey) -> StorePath {
    StorePath::from(key.file_name())
}

fn is_entry(meta: &ObjectMeta) -> bool {
    meta.location
        .filename()
        .is_some_and(|name| name.ends_with(ENTRY_SUFFIX))
}

#[async_trait::async_trait]
impl TranscriptCache for LocalTranscriptCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<TranscriptionArtifact>, CacheError> {
        let result = match self.inner.get(&entry_path(key)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(CacheError::Read(e.to_string())),
        };

        let bytes = result
            .bytes()
            .await
            .map_err(|e| CacheError::Read(e.to_string()))?;

        let entry: StoredEntry =
            serde_json::from_slice(&bytes).map_err(|e| CacheError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if entry.version > ENTRY_VERSION {
            tracing::debug!(
                cache_key = %key,
                version = entry.version,
                "Cache entry has a newer format, ignoring"
            );
            return Ok(None);
        }

        Ok(Some(entry.artifact))
    }

    async fn put(
        &self,
        key: &CacheKey,
        artifact: &TranscriptionArtifact,
    ) -> Result<(), CacheError> {
        let path = entry_path(key);

        if let Some(version) = self
            .stored_version(&path)
            .await
            .filter(|v| *v > ENTRY_VERSION)
        {
            tracing::debug!(
                cache_key = %key,
                version,
                "Keeping cache entry written in a newer format"
            );
            return Ok(());
        }

        let body = serde_json::to_vec(&EntryRef {
            version: ENTRY_VERSION,
            artifact,
        })
        .map_err(|e| CacheError::Write(e.to_string()))?;

        self.inner
            .put(&path, PutPayload::from(body))
            .await
            .map_err(|e| CacheError::Write(e.to_string()))?;

        tracing::debug!(cache_key = %key, "Cache entry written");
        Ok(())
    }

    async fn clear(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for meta in self.entries().await? {
            match self.inner.delete(&meta.location).await {
                Ok(()) => removed += 1,
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(CacheError::Delete(e.to_string())),
            }
        }
        Ok(removed)
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let entries = self.entries().await?;
        Ok(CacheStats {
            entries: entries.len(),
            total_bytes: entries.iter().map(|m| m.size as u64).sum(),
        })
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}
