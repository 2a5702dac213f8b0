mod cache;
mod error_response;
mod health;
mod performance;
mod root;
mod speakers;
mod transcribe;

pub use cache::clear_cache_handler;
pub use error_response::ErrorResponse;
pub use health::health_handler;
pub use performance::performance_info_handler;
pub use root::root_handler;
pub use speakers::speaker_info_handler;
pub use transcribe::{
    CACHE_STATUS_HEADER, PROCESSING_TIME_HEADER, TranscribeParams, transcribe_handler,
};
