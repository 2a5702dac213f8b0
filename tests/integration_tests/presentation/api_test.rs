#[path = "../../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use auris::application::ports::{TranscriptCache, TranscriptionEngine};
use auris::application::services::{ProcessingConfig, SpeakerLabeler, TranscriptionService};
use auris::infrastructure::audio::PlaceholderDiarizer;
use auris::infrastructure::observability::REQUEST_ID_HEADER;
use auris::infrastructure::storage::LocalTranscriptCache;
use auris::presentation::handlers::{CACHE_STATUS_HEADER, PROCESSING_TIME_HEADER};
use auris::presentation::{AppState, create_router};

use helpers::{FakeEngine, multipart_body, multipart_content_type, sample_transcript};

const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

struct TestApp {
    router: Router,
    engine: Arc<FakeEngine>,
    _cache_dir: TempDir,
}

fn build_app(engine: Option<FakeEngine>, labeler: SpeakerLabeler) -> TestApp {
    build_app_with_limit(engine, labeler, MAX_UPLOAD_BYTES)
}

fn build_app_with_limit(
    engine: Option<FakeEngine>,
    labeler: SpeakerLabeler,
    max_upload_bytes: usize,
) -> TestApp {
    let cache_dir = TempDir::new().unwrap();
    let cache: Arc<dyn TranscriptCache> =
        Arc::new(LocalTranscriptCache::new(cache_dir.path().to_path_buf()).unwrap());

    let engine = engine.map(Arc::new);
    let recorder = engine
        .clone()
        .unwrap_or_else(|| Arc::new(FakeEngine::returning(sample_transcript())));

    let service = TranscriptionService::new(
        engine.map(|e| e as Arc<dyn TranscriptionEngine>),
        labeler,
        cache,
        ProcessingConfig::default(),
    );

    let state = AppState {
        transcription_service: Arc::new(service),
        model_name: "whisper-1".to_string(),
        max_upload_bytes,
    };

    TestApp {
        router: create_router(state),
        engine: recorder,
        _cache_dir: cache_dir,
    }
}

fn default_app() -> TestApp {
    build_app(
        Some(FakeEngine::returning(sample_transcript())),
        SpeakerLabeler::pause_heuristic(),
    )
}

fn upload(uri: &str, filename: &str, speaker_flag: Option<&str>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", multipart_content_type())
        .body(Body::from(multipart_body(filename, b"fake audio", speaker_flag)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn given_running_service_when_requesting_root_then_reports_message_and_version() {
    let app = default_app();

    let response = app.router.clone().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Speech-to-Text API is running");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn given_loaded_engine_when_checking_health_then_model_is_loaded() {
    let app = default_app();

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["speaker_diarization_available"], false);
}

#[tokio::test]
async fn given_no_engine_when_checking_health_then_still_healthy_but_not_loaded() {
    let app = build_app(None, SpeakerLabeler::pause_heuristic());

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], false);
}

#[tokio::test]
async fn given_no_diarizer_when_requesting_speaker_info_then_simple_is_active() {
    let app = default_app();

    let response = app.router.clone().oneshot(get("/speakers/info")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["speaker_diarization_available"], true);
    assert_eq!(json["active_method"], "simple");
    assert_eq!(json["methods"]["simple"]["available"], true);
    assert_eq!(json["methods"]["advanced"]["available"], false);
}

#[tokio::test]
async fn given_placeholder_diarizer_when_requesting_speaker_info_then_advanced_is_active() {
    let app = build_app(
        Some(FakeEngine::returning(sample_transcript())),
        SpeakerLabeler::new(Some(Arc::new(PlaceholderDiarizer))),
    );

    let response = app.router.clone().oneshot(get("/speakers/info")).await.unwrap();

    let json = json_body(response).await;
    assert_eq!(json["active_method"], "advanced");
    assert_eq!(json["methods"]["advanced"]["available"], true);
}

#[tokio::test]
async fn given_same_upload_twice_when_transcribing_then_second_response_is_cache_hit() {
    let app = default_app();

    let first = app
        .router
        .clone()
        .oneshot(upload("/transcribe", "meeting.wav", None))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()[CACHE_STATUS_HEADER], "miss");
    assert!(first.headers().contains_key(PROCESSING_TIME_HEADER));
    let first_json = json_body(first).await;

    let second = app
        .router
        .clone()
        .oneshot(upload("/transcribe", "meeting.wav", None))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers()[CACHE_STATUS_HEADER], "hit");
    let second_json = json_body(second).await;

    assert_eq!(first_json, second_json);
    assert_eq!(app.engine.calls(), 1);
    assert_eq!(first_json["segments"][0]["text"], "Hello there.");
    assert!(first_json["segments"][0]["speaker"].is_null());
}

#[tokio::test]
async fn given_speaker_flag_in_query_when_transcribing_then_segments_are_labeled() {
    let app = default_app();

    let response = app
        .router
        .clone()
        .oneshot(upload(
            "/transcribe?enable_speaker_diarization=true",
            "meeting.mp3",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    for segment in json["segments"].as_array().unwrap() {
        assert_eq!(segment["speaker"], "SPEAKER_1");
    }
}

#[tokio::test]
async fn given_speaker_flag_in_form_when_transcribing_then_segments_are_labeled() {
    let app = build_app(
        Some(FakeEngine::returning(sample_transcript())),
        SpeakerLabeler::new(Some(Arc::new(PlaceholderDiarizer))),
    );

    let response = app
        .router
        .clone()
        .oneshot(upload("/transcribe", "meeting.ogg", Some("true")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let speakers: Vec<&str> = json["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["speaker"].as_str().unwrap())
        .collect();
    assert_eq!(speakers, vec!["SPEAKER_1", "SPEAKER_2", "SPEAKER_3"]);
}

#[tokio::test]
async fn given_invalid_speaker_flag_when_transcribing_then_returns_bad_request() {
    let app = default_app();

    let response = app
        .router
        .clone()
        .oneshot(upload("/transcribe", "meeting.wav", Some("maybe")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.engine.calls(), 0);
}

#[tokio::test]
async fn given_text_file_when_transcribing_then_returns_bad_request_with_detail() {
    let app = default_app();

    let response = app
        .router
        .clone()
        .oneshot(upload("/transcribe", "notes.txt", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Unsupported file format"));
    assert!(detail.contains(".mp3"));
    assert_eq!(app.engine.calls(), 0);
}

#[tokio::test]
async fn given_no_file_field_when_transcribing_then_returns_bad_request() {
    let app = default_app();
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{b}--\r\n",
        b = helpers::BOUNDARY
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/transcribe")
                .header("content-type", multipart_content_type())
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["detail"], "No file uploaded");
}

#[tokio::test]
async fn given_no_engine_when_transcribing_then_returns_service_unavailable() {
    let app = build_app(None, SpeakerLabeler::pause_heuristic());

    let response = app
        .router
        .clone()
        .oneshot(upload("/transcribe", "meeting.wav", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = json_body(response).await;
    assert_eq!(json["detail"], "Model not loaded");
}

#[tokio::test]
async fn given_failing_engine_when_transcribing_then_returns_internal_error() {
    let app = build_app(
        Some(FakeEngine::failing("decoder crashed")),
        SpeakerLabeler::pause_heuristic(),
    );

    let response = app
        .router
        .clone()
        .oneshot(upload("/transcribe", "meeting.wav", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error processing audio file:"));
    assert!(detail.contains("decoder crashed"));
}

#[tokio::test]
async fn given_cached_result_when_clearing_cache_then_stats_reset_and_next_request_misses() {
    let app = default_app();
    app.router
        .clone()
        .oneshot(upload("/transcribe", "meeting.wav", None))
        .await
        .unwrap();

    let info = json_body(
        app.router
            .clone()
            .oneshot(get("/performance/info"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(info["model"], "whisper-1");
    assert_eq!(info["optimizations"]["caching_enabled"], true);
    assert_eq!(info["optimizations"]["fp16_disabled"], true);
    assert_eq!(info["optimizations"]["beam_size"], 1);
    assert_eq!(info["cache_stats"]["cached_files"], 1);

    let cleared = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(cleared.status(), StatusCode::OK);
    let cleared = json_body(cleared).await;
    assert_eq!(cleared["status"], "success");
    assert_eq!(cleared["files_deleted"], 1);
    assert_eq!(cleared["message"], "Cleared 1 cached transcription(s)");

    let info = json_body(
        app.router
            .clone()
            .oneshot(get("/performance/info"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(info["cache_stats"]["cached_files"], 0);

    let again = app
        .router
        .clone()
        .oneshot(upload("/transcribe", "meeting.wav", None))
        .await
        .unwrap();
    assert_eq!(again.headers()[CACHE_STATUS_HEADER], "miss");
    assert_eq!(app.engine.calls(), 2);
}

#[tokio::test]
async fn given_no_request_id_when_calling_api_then_one_is_generated() {
    let app = default_app();

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();

    let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn given_client_request_id_when_calling_api_then_it_is_echoed() {
    let app = default_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "trace-me-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-me-123");
}

#[tokio::test]
async fn given_upload_over_limit_when_transcribing_then_rejected_without_engine_call() {
    let app = build_app_with_limit(
        Some(FakeEngine::returning(sample_transcript())),
        SpeakerLabeler::pause_heuristic(),
        64,
    );
    let oversized = vec![7u8; 4096];

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/transcribe")
                .header("content-type", multipart_content_type())
                .body(Body::from(multipart_body("meeting.wav", &oversized, None)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(matches!(
        response.status(),
        StatusCode::PAYLOAD_TOO_LARGE | StatusCode::BAD_REQUEST
    ));
    assert_eq!(app.engine.calls(), 0);
}

#[tokio::test]
async fn given_truncated_speaker_flag_field_when_transcribing_then_returns_bad_request() {
    let app = default_app();
    let body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"enable_speaker_diarization\"\r\n\r\ntru",
        helpers::BOUNDARY
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/transcribe")
                .header("content-type", multipart_content_type())
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Failed to read enable_speaker_diarization"));
    assert_eq!(app.engine.calls(), 0);
}
