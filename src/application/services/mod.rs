mod retry;
mod summary_service;
mod transcription_service;
mod update_dispatcher;

pub use retry::{RetryPolicy, MAX_JITTER_MS};
pub use summary_service::SummaryService;
pub use transcription_service::{TranscriptionModels, TranscriptionService};
pub use update_dispatcher::UpdateDispatcher;
