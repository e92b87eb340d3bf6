use serde::{Deserialize, Serialize};

/// Standard Bot API response envelope. Errors arrive as `ok: false` with a
/// human-readable description, regardless of HTTP status.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(super) struct ApiEnvelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize)]
pub(super) struct SendMessagePayload<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

#[derive(Serialize)]
pub(super) struct EditMessagePayload<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
}

#[derive(Serialize)]
pub(super) struct DeleteMessagePayload {
    pub chat_id: i64,
    pub message_id: i64,
}

#[derive(Serialize)]
pub(super) struct ChatActionPayload<'a> {
    pub chat_id: i64,
    pub action: &'a str,
}

#[derive(Serialize)]
pub(super) struct GetFilePayload<'a> {
    pub file_id: &'a str,
}

#[derive(Serialize)]
pub(super) struct GetUpdatesPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Serialize)]
pub(super) struct SetWebhookPayload<'a> {
    pub url: &'a str,
    pub secret_token: &'a str,
    pub drop_pending_updates: bool,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Serialize)]
pub(super) struct DeleteWebhookPayload {
    pub drop_pending_updates: bool,
}

#[derive(Deserialize)]
pub(super) struct SentMessage {
    pub message_id: i64,
}

#[derive(Deserialize)]
pub(super) struct RemoteFile {
    #[serde(default)]
    pub file_path: Option<String>,
}
