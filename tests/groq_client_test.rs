use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;

use voxrelay::application::ports::{AudioInput, TranscriptionError, TranscriptionProvider};
use voxrelay::infrastructure::speech::GroqSpeechClient;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: String) -> GroqSpeechClient {
    GroqSpeechClient::new(
        "gsk-test".to_string(),
        Some(base_url),
        "ru".to_string(),
        Duration::from_secs(5),
    )
}

fn audio() -> AudioInput {
    AudioInput::new(vec![1, 2, 3, 4], "voice.ogg")
}

#[tokio::test]
async fn given_successful_response_when_transcribing_then_text_is_trimmed() {
    let router = Router::new().route(
        "/audio/transcriptions",
        post(|| async { "  привет мир \n" }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).transcribe(&audio(), "whisper-large-v3").await;

    assert_eq!(result.unwrap(), "привет мир");
}

#[tokio::test]
async fn given_whitespace_only_response_when_transcribing_then_empty_success_is_returned() {
    let router = Router::new().route("/audio/transcriptions", post(|| async { "   \n" }));
    let base_url = spawn_server(router).await;

    let result = client(base_url).transcribe(&audio(), "whisper-large-v3").await;

    assert_eq!(result.unwrap(), "");
}

#[tokio::test]
async fn given_format_rejection_when_transcribing_then_unsupported_format_is_classified() {
    let router = Router::new().route(
        "/audio/transcriptions",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                r#"{"error":{"message":"Unsupported file format `txt`"}}"#,
            )
        }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).transcribe(&audio(), "whisper-large-v3").await;

    assert!(matches!(result, Err(TranscriptionError::UnsupportedFormat)));
}

#[tokio::test]
async fn given_unrelated_bad_request_when_transcribing_then_error_stays_unclassified() {
    let router = Router::new().route(
        "/audio/transcriptions",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                r#"{"error":{"message":"model decommissioned"}}"#,
            )
        }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).transcribe(&audio(), "whisper-large-v3").await;

    assert!(matches!(result, Err(TranscriptionError::Unclassified(_))));
}

#[tokio::test]
async fn given_server_error_when_transcribing_then_service_unavailable_is_classified() {
    let router = Router::new().route(
        "/audio/transcriptions",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream down") }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).transcribe(&audio(), "whisper-large-v3").await;

    assert!(matches!(result, Err(TranscriptionError::ServiceUnavailable)));
}

#[tokio::test]
async fn given_rate_limit_when_transcribing_then_service_unavailable_is_classified() {
    let router = Router::new().route(
        "/audio/transcriptions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).transcribe(&audio(), "whisper-large-v3").await;

    assert!(matches!(result, Err(TranscriptionError::ServiceUnavailable)));
}

#[tokio::test]
async fn given_unreachable_server_when_transcribing_then_transport_error_maps_to_unavailable() {
    // Port from a listener that is dropped before the request goes out.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = client(base_url).transcribe(&audio(), "whisper-large-v3").await;

    assert!(matches!(result, Err(TranscriptionError::ServiceUnavailable)));
}
