use async_trait::async_trait;

/// Audio handed to a single transcription attempt. Immutable per attempt;
/// the file name carries the extension providers use for format detection.
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl AudioInput {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
        }
    }
}

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// One attempt against one model. Success may be the empty string:
    /// whitespace-only provider output is normalized to `""`, which is a
    /// valid result and not a failure.
    async fn transcribe(
        &self,
        audio: &AudioInput,
        model: &str,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TranscriptionError {
    #[error("unsupported audio format")]
    UnsupportedFormat,
    #[error("transcription service unavailable")]
    ServiceUnavailable,
    #[error("transcription request timed out")]
    Timeout,
    #[error("transcription failed: {0}")]
    Unclassified(String),
}
