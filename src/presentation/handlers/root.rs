use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Speech-to-Text API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
