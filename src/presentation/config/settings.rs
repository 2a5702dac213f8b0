use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::ports::DecodingOptions;
use crate::application::services::ProcessingConfig;

use super::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub diarization: DiarizationSettings,
    pub cache: CacheSettings,
    pub processing: ProcessingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub provider: EngineProvider,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineProvider {
    #[serde(rename = "openai")]
    OpenAi,
    WhisperServer,
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiarizationSettings {
    pub provider: DiarizationProvider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiarizationProvider {
    None,
    Placeholder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingSettings {
    pub engine_timeout_secs: u64,
    pub max_concurrent_transcriptions: usize,
    pub staging_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub enable_json: bool,
}

impl Settings {
    /// Built-in defaults, then `appsettings.{environment}` if present, then
    /// `APP__SECTION__KEY` environment variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000_i64)?
            .set_default("server.max_upload_mb", 100_i64)?
            .set_default("engine.provider", "whisper_server")?
            .set_default("engine.model", "whisper-1")?
            .set_default("diarization.provider", "none")?
            .set_default("cache.directory", "./transcription_cache")?
            .set_default("processing.engine_timeout_secs", 600_i64)?
            .set_default("processing.max_concurrent_transcriptions", 1_i64)?
            .set_default("logging.enable_json", false)?
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()
    }

    pub fn processing_config(&self) -> ProcessingConfig {
        ProcessingConfig {
            decoding: DecodingOptions::deterministic(),
            engine_timeout: Duration::from_secs(self.processing.engine_timeout_secs),
            max_concurrent_transcriptions: self.processing.max_concurrent_transcriptions,
            staging_dir: self.processing.staging_dir.as_ref().map(PathBuf::from),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
