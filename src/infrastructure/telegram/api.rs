use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{
    ApiEnvelope, ChatActionPayload, DeleteMessagePayload, DeleteWebhookPayload,
    EditMessagePayload, GetFilePayload, GetUpdatesPayload, RemoteFile, SendMessagePayload,
    SentMessage, SetWebhookPayload,
};
use crate::application::ports::{BotApi, BotApiError, Update};
use crate::domain::{ChatId, FileId, MessageId};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Bot API over HTTPS. Edit/delete/action results are acknowledged but not
/// inspected; only calls whose result the dispatcher needs are decoded.
pub struct TelegramBotApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl TelegramBotApi {
    pub fn new(token: String, base_url: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            token,
            timeout,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.token, file_path)
    }

    async fn call<T>(&self, method: &str, payload: &impl Serialize) -> Result<T, BotApiError>
    where
        T: DeserializeOwned,
    {
        self.call_with_timeout(method, payload, self.timeout).await
    }

    async fn call_with_timeout<T>(
        &self,
        method: &str,
        payload: &impl Serialize,
        timeout: Duration,
    ) -> Result<T, BotApiError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| BotApiError::Network(e.to_string()))?;

        decode_envelope(method, response).await
    }

    async fn call_discarding(
        &self,
        method: &str,
        payload: &impl Serialize,
    ) -> Result<(), BotApiError> {
        self.call::<serde_json::Value>(method, payload).await?;
        Ok(())
    }
}

async fn decode_envelope<T>(method: &str, response: reqwest::Response) -> Result<T, BotApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let envelope: ApiEnvelope<T> = response
        .json()
        .await
        .map_err(|e| BotApiError::InvalidResponse(format!("{}: {}", method, e)))?;

    if !envelope.ok {
        let description = envelope
            .description
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(BotApiError::ApiRequestFailed(format!(
            "{}: {}",
            method, description
        )));
    }

    envelope
        .result
        .ok_or_else(|| BotApiError::InvalidResponse(format!("{}: missing result", method)))
}

#[async_trait]
impl BotApi for TelegramBotApi {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageId, BotApiError> {
        let payload = SendMessagePayload {
            chat_id: chat.as_i64(),
            text,
            reply_to_message_id: reply_to.map(|id| id.as_i64()),
        };
        let sent: SentMessage = self.call("sendMessage", &payload).await?;
        Ok(MessageId::new(sent.message_id))
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), BotApiError> {
        let payload = EditMessagePayload {
            chat_id: chat.as_i64(),
            message_id: message.as_i64(),
            text,
        };
        self.call_discarding("editMessageText", &payload).await
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), BotApiError> {
        let payload = DeleteMessagePayload {
            chat_id: chat.as_i64(),
            message_id: message.as_i64(),
        };
        self.call_discarding("deleteMessage", &payload).await
    }

    async fn send_chat_action(&self, chat: ChatId, action: &str) -> Result<(), BotApiError> {
        let payload = ChatActionPayload {
            chat_id: chat.as_i64(),
            action,
        };
        self.call_discarding("sendChatAction", &payload).await
    }

    async fn send_document(
        &self,
        chat: ChatId,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<(), BotApiError> {
        let document = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let mut form = multipart::Form::new()
            .text("chat_id", chat.as_i64().to_string())
            .part("document", document);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        let response = self
            .client
            .post(self.method_url("sendDocument"))
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BotApiError::Network(e.to_string()))?;

        decode_envelope::<serde_json::Value>("sendDocument", response).await?;
        Ok(())
    }

    async fn download_file(&self, file_id: &FileId) -> Result<Vec<u8>, BotApiError> {
        let payload = GetFilePayload {
            file_id: file_id.as_str(),
        };
        let remote: RemoteFile = self.call("getFile", &payload).await?;
        let file_path = remote
            .file_path
            .ok_or_else(|| BotApiError::InvalidResponse("getFile: missing file path".to_string()))?;

        let response = self
            .client
            .get(self.file_url(&file_path))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| BotApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotApiError::ApiRequestFailed(format!(
                "file download: HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BotApiError::Network(e.to_string()))?;
        tracing::debug!(bytes = bytes.len(), "Downloaded file from Bot API");

        Ok(bytes.to_vec())
    }

    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, BotApiError> {
        let payload = GetUpdatesPayload {
            offset,
            timeout: timeout_secs,
            allowed_updates: &["message"],
        };
        // HTTP timeout must outlast the server-side long-poll hold.
        let request_timeout = self.timeout + Duration::from_secs(timeout_secs);
        self.call_with_timeout("getUpdates", &payload, request_timeout)
            .await
    }

    async fn set_webhook(&self, url: &str, secret: &str) -> Result<(), BotApiError> {
        let payload = SetWebhookPayload {
            url,
            secret_token: secret,
            drop_pending_updates: true,
            allowed_updates: &["message"],
        };
        self.call_discarding("setWebhook", &payload).await?;
        tracing::info!(url, "Webhook registered");
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), BotApiError> {
        let payload = DeleteWebhookPayload {
            drop_pending_updates: true,
        };
        self.call_discarding("deleteWebhook", &payload).await?;
        tracing::info!("Webhook removed");
        Ok(())
    }
}
