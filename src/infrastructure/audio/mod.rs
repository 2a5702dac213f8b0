mod diarizer_factory;
mod openai_whisper_engine;
mod placeholder_diarizer;
mod transcription_engine_factory;

pub use diarizer_factory::DiarizerFactory;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use placeholder_diarizer::PlaceholderDiarizer;
pub use transcription_engine_factory::TranscriptionEngineFactory;
