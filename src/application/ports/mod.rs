mod bot_api;
mod summary_provider;
mod transcription_provider;
mod update;

pub use bot_api::{BotApi, BotApiError};
pub use summary_provider::{SummaryProvider, SummaryProviderError};
pub use transcription_provider::{AudioInput, TranscriptionError, TranscriptionProvider};
pub use update::{Audio, Chat, DocumentAttachment, IncomingMessage, Update, User, Voice};
