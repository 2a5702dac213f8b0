mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    CacheSettings, DiarizationProvider, DiarizationSettings, EngineProvider, EngineSettings,
    LoggingSettings, ProcessingSettings, ServerSettings, Settings,
};
