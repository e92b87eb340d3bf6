use std::time::Duration;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use voxrelay::application::ports::{BotApi, BotApiError};
use voxrelay::domain::{ChatId, FileId, MessageId};
use voxrelay::infrastructure::telegram::TelegramBotApi;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn bot(base_url: String) -> TelegramBotApi {
    TelegramBotApi::new("TOKEN".to_string(), Some(base_url), Duration::from_secs(5))
}

#[tokio::test]
async fn given_ok_envelope_when_sending_message_then_message_id_is_returned() {
    let router = Router::new().route(
        "/botTOKEN/sendMessage",
        post(|| async { Json(json!({"ok": true, "result": {"message_id": 77}})) }),
    );
    let base_url = spawn_server(router).await;

    let message_id = bot(base_url)
        .send_message(ChatId::new(7), "привет", None)
        .await
        .unwrap();

    assert_eq!(message_id, MessageId::new(77));
}

#[tokio::test]
async fn given_error_envelope_when_sending_message_then_description_is_surfaced() {
    let router = Router::new().route(
        "/botTOKEN/sendMessage",
        post(|| async {
            Json(json!({"ok": false, "description": "Bad Request: chat not found"}))
        }),
    );
    let base_url = spawn_server(router).await;

    let error = bot(base_url)
        .send_message(ChatId::new(7), "привет", None)
        .await
        .unwrap_err();

    match error {
        BotApiError::ApiRequestFailed(message) => {
            assert!(message.contains("chat not found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn given_file_id_when_downloading_then_path_is_resolved_and_bytes_fetched() {
    let router = Router::new()
        .route(
            "/botTOKEN/getFile",
            post(|| async {
                Json(json!({"ok": true, "result": {"file_path": "voice/file_1.oga"}}))
            }),
        )
        .route(
            "/file/botTOKEN/voice/file_1.oga",
            get(|| async { "audio-bytes" }),
        );
    let base_url = spawn_server(router).await;

    let bytes = bot(base_url)
        .download_file(&FileId::new("abc"))
        .await
        .unwrap();

    assert_eq!(bytes, b"audio-bytes");
}

#[tokio::test]
async fn given_get_file_without_path_when_downloading_then_invalid_response_error() {
    let router = Router::new().route(
        "/botTOKEN/getFile",
        post(|| async { Json(json!({"ok": true, "result": {}})) }),
    );
    let base_url = spawn_server(router).await;

    let error = bot(base_url)
        .download_file(&FileId::new("abc"))
        .await
        .unwrap_err();

    assert!(matches!(error, BotApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn given_updates_envelope_when_polling_then_messages_are_decoded() {
    let router = Router::new().route(
        "/botTOKEN/getUpdates",
        post(|| async {
            Json(json!({
                "ok": true,
                "result": [{
                    "update_id": 5,
                    "message": {
                        "message_id": 1,
                        "chat": {"id": 7},
                        "from": {"id": 42, "username": "alice"},
                        "voice": {"file_id": "v1", "duration": 12}
                    }
                }]
            }))
        }),
    );
    let base_url = spawn_server(router).await;

    let updates = bot(base_url).get_updates(None, 0).await.unwrap();

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update_id, 5);
    let message = updates[0].message.as_ref().unwrap();
    assert_eq!(message.chat.id, 7);
    assert_eq!(message.voice.as_ref().unwrap().file_id, "v1");
}
