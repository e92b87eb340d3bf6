use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::StatusCode;

use crate::application::ports::{AudioInput, TranscriptionError, TranscriptionProvider};
use crate::domain::transcript;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Whisper-family transcription over the Groq OpenAI-compatible API.
/// The model is chosen per call so one client serves both the primary and
/// the fallback attempt.
pub struct GroqSpeechClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    language: String,
    timeout: Duration,
}

impl GroqSpeechClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        language: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            language,
            timeout,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for GroqSpeechClient {
    async fn transcribe(
        &self,
        audio: &AudioInput,
        model: &str,
    ) -> Result<String, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part =
            multipart::Part::bytes(audio.bytes.clone()).file_name(audio.file_name.clone());

        let form = multipart::Form::new()
            .text("model", model.to_string())
            .text("language", self.language.clone())
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(model, bytes = audio.bytes.len(), "Sending audio to Groq Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(classify_status(status, &body));
        }

        let raw = response
            .text()
            .await
            .map_err(|e| TranscriptionError::Unclassified(format!("body: {}", e)))?;

        let text = transcript::normalize(&raw);
        if text.is_empty() {
            tracing::warn!(model, "Transcription came back empty");
        }

        Ok(text)
    }
}

fn classify_transport_error(error: reqwest::Error) -> TranscriptionError {
    if error.is_timeout() {
        TranscriptionError::Timeout
    } else {
        tracing::debug!(%error, "Transcription transport error");
        TranscriptionError::ServiceUnavailable
    }
}

fn classify_status(status: StatusCode, body: &str) -> TranscriptionError {
    match status {
        StatusCode::BAD_REQUEST => classify_bad_request(body),
        StatusCode::REQUEST_TIMEOUT => TranscriptionError::Timeout,
        StatusCode::TOO_MANY_REQUESTS => TranscriptionError::ServiceUnavailable,
        status if status.is_server_error() => TranscriptionError::ServiceUnavailable,
        status => {
            TranscriptionError::Unclassified(format!("HTTP {}: {}", status, snippet(body)))
        }
    }
}

/// Groq reports a bad audio file as a 400 with a descriptive message and,
/// in newer API revisions, a machine-readable error code. The code is
/// checked first; the message-substring match stays as a fallback because
/// no stable code exists across all deployments yet.
fn classify_bad_request(body: &str) -> TranscriptionError {
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &parsed["error"];
        if let Some(code) = error["code"].as_str() {
            if code.contains("format") || code.contains("unsupported") {
                return TranscriptionError::UnsupportedFormat;
            }
        }
        if let Some(message) = error["message"].as_str() {
            let lowered = message.to_lowercase();
            if lowered.contains("unsupported") || lowered.contains("format") {
                return TranscriptionError::UnsupportedFormat;
            }
            return TranscriptionError::Unclassified(format!("HTTP 400: {}", snippet(message)));
        }
    }

    let lowered = body.to_lowercase();
    if lowered.contains("unsupported") || lowered.contains("format") {
        return TranscriptionError::UnsupportedFormat;
    }
    TranscriptionError::Unclassified(format!("HTTP 400: {}", snippet(body)))
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
