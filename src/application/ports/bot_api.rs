use async_trait::async_trait;

use super::update::Update;
use crate::domain::{ChatId, FileId, MessageId};

/// Chat-platform surface the dispatcher talks through. One implementation
/// speaks the real Bot API over HTTP; tests swap in scripted fakes.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageId, BotApiError>;

    async fn edit_message(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), BotApiError>;

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), BotApiError>;

    /// `action` is a Bot API chat action name, e.g. `"typing"`.
    async fn send_chat_action(&self, chat: ChatId, action: &str) -> Result<(), BotApiError>;

    async fn send_document(
        &self,
        chat: ChatId,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<(), BotApiError>;

    /// Resolves the file behind `file_id` and downloads its full contents.
    async fn download_file(&self, file_id: &FileId) -> Result<Vec<u8>, BotApiError>;

    /// Long-polls for updates. `timeout_secs` is the server-side hold time;
    /// implementations must keep their own HTTP timeout above it.
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, BotApiError>;

    async fn set_webhook(&self, url: &str, secret: &str) -> Result<(), BotApiError>;

    async fn delete_webhook(&self) -> Result<(), BotApiError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BotApiError {
    #[error("bot api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("bot api network error: {0}")]
    Network(String),
    #[error("bot api returned an invalid response: {0}")]
    InvalidResponse(String),
}
