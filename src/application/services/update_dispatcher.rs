use std::path::Path;
use std::sync::Arc;

use tracing::Instrument;

use crate::application::ports::{
    AudioInput, BotApi, IncomingMessage, SummaryProvider, TranscriptionError,
    TranscriptionProvider, Update,
};
use crate::application::services::summary_service::SummaryService;
use crate::application::services::transcription_service::TranscriptionService;
use crate::domain::{bot_messages, transcript, Allowlist, ChatId, FileId, MessageId};

/// Resolved audio attachment of an incoming message.
struct Attachment {
    file_id: FileId,
    file_name: String,
    duration_secs: f64,
}

/// Routes incoming platform updates: allowlist gate, command replies, and
/// the full audio pipeline from download to delivered transcript. Failures
/// here are mapped to user-facing replies and never escape, so one broken
/// update cannot take the process down.
pub struct UpdateDispatcher<P, S, B>
where
    P: TranscriptionProvider,
    S: SummaryProvider,
    B: BotApi,
{
    bot: Arc<B>,
    transcription: Arc<TranscriptionService<P>>,
    summary: Option<Arc<SummaryService<S>>>,
    allowlist: Allowlist,
}

impl<P, S, B> UpdateDispatcher<P, S, B>
where
    P: TranscriptionProvider,
    S: SummaryProvider,
    B: BotApi,
{
    pub fn new(
        bot: Arc<B>,
        transcription: Arc<TranscriptionService<P>>,
        summary: Option<Arc<SummaryService<S>>>,
        allowlist: Allowlist,
    ) -> Self {
        Self {
            bot,
            transcription,
            summary,
            allowlist,
        }
    }

    pub async fn dispatch(&self, update: Update) {
        let span = tracing::info_span!("update", update_id = update.update_id);
        self.process(update).instrument(span).await;
    }

    async fn process(&self, update: Update) {
        let Some(message) = update.message else {
            tracing::debug!("Update carries no message, ignoring");
            return;
        };

        if !self.is_allowed(&message) {
            let user_id = message.from.as_ref().map(|user| user.id);
            tracing::warn!(?user_id, "Access denied");
            self.reply_quietly(&message, bot_messages::ACCESS_DENIED)
                .await;
            return;
        }

        if let Some(text) = message.text.as_deref() {
            if let Some(token) = text.split_whitespace().next() {
                if is_command(token, "start") {
                    self.reply_quietly(&message, bot_messages::START).await;
                    return;
                }
                if is_command(token, "help") {
                    self.reply_quietly(&message, bot_messages::HELP).await;
                    return;
                }
            }
        }

        if message.voice.is_some() || message.audio.is_some() || message.document.is_some() {
            self.handle_audio(&message).await;
        } else {
            tracing::debug!("Message has no audio content, ignoring");
        }
    }

    async fn handle_audio(&self, message: &IncomingMessage) {
        let chat = ChatId::new(message.chat.id);
        let reply_to = MessageId::new(message.message_id);

        let processing = match self
            .bot
            .send_message(chat, bot_messages::PROCESSING, Some(reply_to))
            .await
        {
            Ok(id) => id,
            Err(error) => {
                tracing::error!(%error, "Could not send processing notice");
                return;
            }
        };

        if let Err(error) = self.bot.send_chat_action(chat, "typing").await {
            tracing::debug!(%error, "Could not send typing action");
        }

        let Some(attachment) = resolve_attachment(message) else {
            self.edit_quietly(chat, processing, bot_messages::UNSUPPORTED_FORMAT)
                .await;
            return;
        };

        tracing::info!(
            file_id = attachment.file_id.as_str(),
            file_name = %attachment.file_name,
            "Processing audio attachment"
        );

        let bytes = match self.bot.download_file(&attachment.file_id).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!(%error, "Audio download failed");
                self.edit_quietly(chat, processing, bot_messages::DOWNLOAD_ERROR)
                    .await;
                return;
            }
        };

        let audio = AudioInput::new(bytes, attachment.file_name.clone());

        match self.transcription.transcribe(&audio).await {
            Ok(text) if text.is_empty() => {
                self.edit_quietly(chat, processing, bot_messages::EMPTY_TRANSCRIPTION)
                    .await;
            }
            Ok(text) => {
                self.deliver(chat, processing, reply_to, &text, attachment.duration_secs)
                    .await;
                self.send_summary(chat, reply_to, &text).await;
            }
            Err(TranscriptionError::UnsupportedFormat) => {
                self.edit_quietly(chat, processing, bot_messages::UNSUPPORTED_FORMAT)
                    .await;
            }
            Err(TranscriptionError::ServiceUnavailable) => {
                self.edit_quietly(chat, processing, bot_messages::SERVICE_UNAVAILABLE)
                    .await;
            }
            Err(TranscriptionError::Timeout) => {
                self.edit_quietly(chat, processing, bot_messages::TIMEOUT_ERROR)
                    .await;
            }
            Err(TranscriptionError::Unclassified(reason)) => {
                tracing::error!(reason, "Unexpected transcription failure");
                self.edit_quietly(chat, processing, bot_messages::GENERAL_ERROR)
                    .await;
            }
        }
    }

    /// Picks the delivery shape: long transcripts go out as a text document
    /// with a preview caption, short ones replace the processing notice, and
    /// anything that cannot be sent as a document falls back to numbered
    /// message parts.
    async fn deliver(
        &self,
        chat: ChatId,
        processing: MessageId,
        reply_to: MessageId,
        text: &str,
        duration_secs: f64,
    ) {
        if transcript::should_send_as_document(text, duration_secs) {
            let file_name = format!(
                "transcription_{}.txt",
                chrono::Local::now().format("%Y-%m-%d_%H-%M")
            );
            let caption = format!(
                "{}\n\n{}",
                transcript::stats_line(text, duration_secs),
                transcript::preview(text)
            );

            match self
                .bot
                .send_document(chat, &file_name, text.as_bytes().to_vec(), Some(&caption))
                .await
            {
                Ok(()) => {
                    if let Err(error) = self.bot.delete_message(chat, processing).await {
                        tracing::debug!(%error, "Could not delete processing notice");
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "Document delivery failed, falling back to message parts");
                    self.deliver_chunks(chat, processing, reply_to, text).await;
                }
            }
            return;
        }

        if text.chars().count() <= transcript::MAX_MESSAGE_CHARS {
            self.edit_quietly(chat, processing, text).await;
        } else {
            self.deliver_chunks(chat, processing, reply_to, text).await;
        }
    }

    async fn deliver_chunks(
        &self,
        chat: ChatId,
        processing: MessageId,
        reply_to: MessageId,
        text: &str,
    ) {
        if let Err(error) = self.bot.delete_message(chat, processing).await {
            tracing::debug!(%error, "Could not delete processing notice");
        }

        let parts = transcript::split_into_chunks(text, transcript::MAX_MESSAGE_CHARS);
        let total = parts.len();
        for (index, part) in parts.iter().enumerate() {
            let body = format!("{}{}", bot_messages::part_header(index + 1, total), part);
            let reply = if index == 0 { Some(reply_to) } else { None };
            if let Err(error) = self.bot.send_message(chat, &body, reply).await {
                tracing::error!(%error, part = index + 1, total, "Could not deliver transcript part");
                return;
            }
        }
    }

    /// Summarization is best effort: a missing service or a failed summary
    /// leaves the delivered transcript untouched.
    async fn send_summary(&self, chat: ChatId, reply_to: MessageId, text: &str) {
        let Some(summary_service) = &self.summary else {
            return;
        };
        let Some(summary) = summary_service.summarize(text).await else {
            return;
        };

        let body = format!("{}{}", bot_messages::SUMMARY_HEADER, summary);
        let parts = transcript::split_into_chunks(&body, transcript::MAX_MESSAGE_CHARS);
        for (index, part) in parts.iter().enumerate() {
            let reply = if index == 0 { Some(reply_to) } else { None };
            if let Err(error) = self.bot.send_message(chat, part, reply).await {
                tracing::warn!(%error, "Could not deliver summary");
                return;
            }
        }
    }

    fn is_allowed(&self, message: &IncomingMessage) -> bool {
        match &message.from {
            Some(user) => self.allowlist.allows(user.id, user.username.as_deref()),
            None => false,
        }
    }

    async fn reply_quietly(&self, message: &IncomingMessage, text: &str) {
        let chat = ChatId::new(message.chat.id);
        let reply_to = MessageId::new(message.message_id);
        if let Err(error) = self.bot.send_message(chat, text, Some(reply_to)).await {
            tracing::debug!(%error, "Could not send reply");
        }
    }

    async fn edit_quietly(&self, chat: ChatId, message: MessageId, text: &str) {
        if let Err(error) = self.bot.edit_message(chat, message, text).await {
            tracing::debug!(%error, "Could not edit message");
        }
    }
}

fn is_command(token: &str, name: &str) -> bool {
    match token.strip_prefix('/') {
        Some(rest) => rest.split('@').next() == Some(name),
        None => false,
    }
}

fn resolve_attachment(message: &IncomingMessage) -> Option<Attachment> {
    if let Some(voice) = &message.voice {
        return Some(Attachment {
            file_id: FileId::new(voice.file_id.clone()),
            file_name: "voice.ogg".to_string(),
            duration_secs: f64::from(voice.duration.unwrap_or(0)),
        });
    }
    if let Some(audio) = &message.audio {
        return Some(Attachment {
            file_id: FileId::new(audio.file_id.clone()),
            file_name: attachment_file_name(audio.file_name.as_deref(), "audio"),
            duration_secs: f64::from(audio.duration.unwrap_or(0)),
        });
    }
    if let Some(document) = &message.document {
        return Some(Attachment {
            file_id: FileId::new(document.file_id.clone()),
            file_name: attachment_file_name(document.file_name.as_deref(), "document"),
            duration_secs: 0.0,
        });
    }
    None
}

/// Keeps the sender's file name when it carries an extension the provider
/// can use for format detection. Named files without an extension default to
/// MP3, unnamed attachments to the voice-note OGG container.
fn attachment_file_name(original: Option<&str>, stem: &str) -> String {
    match original {
        Some(name) if Path::new(name).extension().is_some() => name.to_string(),
        Some(_) => format!("{stem}.mp3"),
        None => format!("{stem}.ogg"),
    }
}

#[cfg(test)]
mod tests {
    use super::{attachment_file_name, is_command};

    #[test]
    fn given_command_token_when_matching_then_bot_suffix_is_ignored() {
        assert!(is_command("/start", "start"));
        assert!(is_command("/start@voice_bot", "start"));
        assert!(!is_command("/started", "start"));
        assert!(!is_command("start", "start"));
    }

    #[test]
    fn given_attachment_names_when_resolving_then_extension_is_preserved_or_defaulted() {
        assert_eq!(attachment_file_name(Some("talk.m4a"), "audio"), "talk.m4a");
        assert_eq!(attachment_file_name(Some("talk"), "audio"), "audio.mp3");
        assert_eq!(attachment_file_name(None, "audio"), "audio.ogg");
    }
}
