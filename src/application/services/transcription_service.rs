use std::sync::Arc;

use crate::application::ports::{AudioInput, TranscriptionError, TranscriptionProvider};

/// Model pair used for escalation: the fast primary first, the stronger
/// fallback only when the primary fails for a non-format reason.
#[derive(Debug, Clone)]
pub struct TranscriptionModels {
    pub primary: String,
    pub fallback: String,
}

pub struct TranscriptionService<P>
where
    P: TranscriptionProvider,
{
    provider: Arc<P>,
    models: TranscriptionModels,
}

impl<P> TranscriptionService<P>
where
    P: TranscriptionProvider,
{
    pub fn new(provider: Arc<P>, models: TranscriptionModels) -> Self {
        Self { provider, models }
    }

    /// Transcribes with the primary model and escalates to the fallback on
    /// failure. An unsupported-format verdict is final wherever it occurs:
    /// the file stays broken no matter which model reads it.
    pub async fn transcribe(&self, audio: &AudioInput) -> Result<String, TranscriptionError> {
        match self.provider.transcribe(audio, &self.models.primary).await {
            Ok(text) => {
                tracing::info!(
                    model = %self.models.primary,
                    chars = text.chars().count(),
                    "Transcription succeeded"
                );
                Ok(text)
            }
            Err(TranscriptionError::UnsupportedFormat) => {
                tracing::warn!(
                    model = %self.models.primary,
                    "Audio format rejected, skipping fallback"
                );
                Err(TranscriptionError::UnsupportedFormat)
            }
            Err(primary_error) => {
                tracing::warn!(
                    model = %self.models.primary,
                    error = %primary_error,
                    "Primary transcription model failed, trying fallback"
                );
                match self.provider.transcribe(audio, &self.models.fallback).await {
                    Ok(text) => {
                        tracing::info!(
                            model = %self.models.fallback,
                            chars = text.chars().count(),
                            "Fallback transcription succeeded"
                        );
                        Ok(text)
                    }
                    Err(TranscriptionError::UnsupportedFormat) => {
                        tracing::warn!(
                            model = %self.models.fallback,
                            "Audio format rejected by fallback model"
                        );
                        Err(TranscriptionError::UnsupportedFormat)
                    }
                    Err(fallback_error) => {
                        tracing::error!(
                            primary_error = %primary_error,
                            fallback_error = %fallback_error,
                            "Both transcription models failed"
                        );
                        Err(TranscriptionError::ServiceUnavailable)
                    }
                }
            }
        }
    }
}
