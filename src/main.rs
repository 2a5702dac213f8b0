use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use auris::application::ports::TranscriptCache;
use auris::application::services::{SpeakerLabeler, TranscriptionService};
use auris::infrastructure::audio::{DiarizerFactory, TranscriptionEngineFactory};
use auris::infrastructure::observability::{TracingConfig, init_tracing};
use auris::infrastructure::storage::LocalTranscriptCache;
use auris::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        TracingConfig::from_settings(&settings.logging, environment),
        settings.server.port,
    );

    let cache: Arc<dyn TranscriptCache> = Arc::new(
        LocalTranscriptCache::new(PathBuf::from(&settings.cache.directory))
            .context("Failed to open transcription cache")?,
    );

    tracing::info!(model = %settings.engine.model, "Loading transcription engine...");
    let engine = match TranscriptionEngineFactory::create(&settings.engine) {
        Ok(engine) => {
            tracing::info!("Transcription engine loaded successfully");
            Some(engine)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load transcription engine");
            tracing::warn!("API will return errors until the engine is available");
            None
        }
    };

    let labeler = SpeakerLabeler::new(DiarizerFactory::create(&settings.diarization));
    tracing::info!(
        strategy = labeler.strategy().as_str(),
        "Speaker labeling configured"
    );

    let transcription_service = Arc::new(TranscriptionService::new(
        engine,
        labeler,
        cache,
        settings.processing_config(),
    ));

    let state = AppState {
        transcription_service,
        model_name: settings.engine.model.clone(),
        max_upload_bytes: settings.max_upload_bytes(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
