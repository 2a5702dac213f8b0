use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tempfile::NamedTempFile;
use tokio::sync::Semaphore;

use crate::application::ports::{
    CacheError, CacheStats, DecodingOptions, TranscriptCache, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::{AudioFormat, CacheKey, Segment, TranscriptionArtifact};

use super::keyed_mutex::KeyedMutex;
use super::speaker_labeler::{LabelingStrategy, SpeakerLabeler};

const STAGING_PREFIX: &str = "auris-upload-";

pub struct TranscriptionRequest {
    pub audio: Bytes,
    pub filename: String,
    pub want_speakers: bool,
}

#[derive(Debug, Clone)]
pub struct TranscriptionOutcome {
    pub artifact: TranscriptionArtifact,
    pub cache_hit: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub decoding: DecodingOptions,
    pub engine_timeout: Duration,
    /// Engine calls allowed to run at once. `1` serializes access to the engine.
    pub max_concurrent_transcriptions: usize,
    /// Where uploads are staged; the OS temp dir when `None`.
    pub staging_dir: Option<PathBuf>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            decoding: DecodingOptions::deterministic(),
            engine_timeout: Duration::from_secs(600),
            max_concurrent_transcriptions: 1,
            staging_dir: None,
        }
    }
}

/// Per-request orchestration: validation, cache lookup, staging, the engine
/// call, speaker labeling and the cache write.
pub struct TranscriptionService {
    engine: Option<Arc<dyn TranscriptionEngine>>,
    labeler: SpeakerLabeler,
    cache: Arc<dyn TranscriptCache>,
    config: ProcessingConfig,
    engine_permits: Semaphore,
    in_flight: KeyedMutex,
}

impl TranscriptionService {
    pub fn new(
        engine: Option<Arc<dyn TranscriptionEngine>>,
        labeler: SpeakerLabeler,
        cache: Arc<dyn TranscriptCache>,
        config: ProcessingConfig,
    ) -> Self {
        let permits = config.max_concurrent_transcriptions.max(1);
        Self {
            engine,
            labeler,
            cache,
            config,
            engine_permits: Semaphore::new(permits),
            in_flight: KeyedMutex::new(),
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            filename = %request.filename,
            bytes = request.audio.len(),
            want_speakers = request.want_speakers
        )
    )]
    pub async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionOutcome, TranscriptionServiceError> {
        let started = Instant::now();

        let engine = self
            .engine
            .as_ref()
            .ok_or(TranscriptionServiceError::EngineUnavailable)?;

        let format = AudioFormat::from_filename(&request.filename).ok_or_else(|| {
            TranscriptionServiceError::UnsupportedFormat {
                filename: request.filename.clone(),
            }
        })?;

        let key = CacheKey::derive(&request.audio, request.want_speakers);

        if let Some(artifact) = self.lookup(&key).await {
            return Ok(self.cache_hit(&key, artifact, started));
        }

        let _slot = self.in_flight.lock(key.as_str()).await;

        // A concurrent request for the same key may have finished while we waited.
        if let Some(artifact) = self.lookup(&key).await {
            return Ok(self.cache_hit(&key, artifact, started));
        }

        let artifact = self
            .run_pipeline(engine.as_ref(), &request, format)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Transcription failed"))?;

        self.store(&key, &artifact).await;

        let elapsed = started.elapsed();
        tracing::info!(
            cache_key = %key,
            segments = artifact.segments.len(),
            labeled = artifact.has_speakers(),
            elapsed_secs = elapsed.as_secs_f64(),
            "Transcription completed"
        );

        Ok(TranscriptionOutcome {
            artifact,
            cache_hit: false,
            elapsed,
        })
    }

    pub fn is_engine_ready(&self) -> bool {
        self.engine.is_some()
    }

    pub fn speaker_strategy(&self) -> LabelingStrategy {
        self.labeler.strategy()
    }

    pub fn decoding_options(&self) -> &DecodingOptions {
        &self.config.decoding
    }

    pub fn cache_location(&self) -> String {
        self.cache.location()
    }

    pub async fn cache_stats(&self) -> Result<CacheStats, CacheError> {
        self.cache.stats().await
    }

    pub async fn clear_cache(&self) -> Result<usize, CacheError> {
        let removed = self.cache.clear().await?;
        tracing::info!(files_deleted = removed, "Transcription cache cleared");
        Ok(removed)
    }

    async fn run_pipeline(
        &self,
        engine: &dyn TranscriptionEngine,
        request: &TranscriptionRequest,
        format: AudioFormat,
    ) -> Result<TranscriptionArtifact, TranscriptionServiceError> {
        // Removed from disk when dropped, whichever way this function returns.
        let staged = self.stage(&request.audio, format).await?;
        tracing::debug!(path = %staged.path().display(), "Upload staged");

        let raw = {
            let _permit = self
                .engine_permits
                .acquire()
                .await
                .map_err(|_| TranscriptionServiceError::EngineUnavailable)?;

            tracing::debug!("Starting audio transcription");
            tokio::time::timeout(
                self.config.engine_timeout,
                engine.transcribe(staged.path(), &self.config.decoding),
            )
            .await
            .map_err(|_| TranscriptionServiceError::Timeout(self.config.engine_timeout))??
        };

        let mut segments: Vec<Segment> = raw
            .segments
            .iter()
            .map(|s| Segment::new(s.start, s.end, &s.text))
            .collect();

        if request.want_speakers {
            tracing::debug!(
                strategy = self.labeler.strategy().as_str(),
                "Labeling speakers"
            );
            self.labeler.label(staged.path(), &mut segments).await;
        }

        Ok(TranscriptionArtifact::new(raw.text, segments))
    }

    async fn stage(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<NamedTempFile, TranscriptionServiceError> {
        let suffix = format!(".{}", format.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX).suffix(&suffix);

        let staged = match &self.config.staging_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(TranscriptionServiceError::Staging)?;

        tokio::fs::write(staged.path(), audio)
            .await
            .map_err(TranscriptionServiceError::Staging)?;

        Ok(staged)
    }

    async fn lookup(&self, key: &CacheKey) -> Option<TranscriptionArtifact> {
        match self.cache.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, cache_key = %key, "Failed to load cache entry, treating as miss");
                None
            }
        }
    }

    async fn store(&self, key: &CacheKey, artifact: &TranscriptionArtifact) {
        if let Err(e) = self.cache.put(key, artifact).await {
            tracing::warn!(error = %e, cache_key = %key, "Failed to save cache entry");
        }
    }

    fn cache_hit(
        &self,
        key: &CacheKey,
        artifact: TranscriptionArtifact,
        started: Instant,
    ) -> TranscriptionOutcome {
        let elapsed = started.elapsed();
        tracing::info!(
            cache_key = %key,
            elapsed_secs = elapsed.as_secs_f64(),
            "Cache hit for transcription"
        );
        TranscriptionOutcome {
            artifact,
            cache_hit: true,
            elapsed,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error(
        "Unsupported file format for '{filename}'. Allowed formats: {allowed}",
        allowed = AudioFormat::allowed_list()
    )]
    UnsupportedFormat { filename: String },
    #[error("Model not loaded")]
    EngineUnavailable,
    #[error("staging upload: {0}")]
    Staging(#[source] std::io::Error),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("transcription timed out after {0:?}")]
    Timeout(Duration),
}
