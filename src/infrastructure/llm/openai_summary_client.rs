use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::ports::{SummaryProvider, SummaryProviderError};
use crate::domain::{ApiSurface, SummaryRoute};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

// Sampling tuned for summarization: near-deterministic output with a light
// penalty against repeating the transcript's own phrasing.
const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 1.0;
const PRESENCE_PENALTY: f32 = 0.0;
const FREQUENCY_PENALTY: f32 = 0.2;

/// Summarization over the OpenAI API. Speaks both request shapes the
/// backend understands: the chat-completions surface and the responses
/// surface used as a last resort.
pub struct OpenAiSummaryClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<ResponsesInputItem<'a>>,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct ResponsesInputItem<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<ResponsesOutputItem>,
}

#[derive(Deserialize)]
struct ResponsesOutputItem {
    #[serde(default)]
    content: Vec<ResponsesContentItem>,
}

#[derive(Deserialize)]
struct ResponsesContentItem {
    #[serde(default)]
    text: Option<String>,
}

impl OpenAiSummaryClient {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout,
        }
    }

    async fn complete_chat(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, SummaryProviderError> {
        let request_body = ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            presence_penalty: PRESENCE_PENALTY,
            frequency_penalty: FREQUENCY_PENALTY,
            max_tokens: max_output_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let response = check_status(response).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|_| SummaryProviderError::EmptyContent)?;

        non_empty(
            completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
        )
    }

    async fn complete_responses(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, SummaryProviderError> {
        let request_body = ResponsesRequest {
            model,
            input: vec![
                ResponsesInputItem {
                    role: "system",
                    content: system_prompt,
                },
                ResponsesInputItem {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_output_tokens,
        };

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let response = check_status(response).await?;

        let completion: ResponsesResponse = response
            .json()
            .await
            .map_err(|_| SummaryProviderError::EmptyContent)?;

        let text: String = completion
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter_map(|content| content.text)
            .collect();

        non_empty(Some(text))
    }
}

#[async_trait]
impl SummaryProvider for OpenAiSummaryClient {
    async fn complete(
        &self,
        route: &SummaryRoute,
        system_prompt: &str,
        user_prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, SummaryProviderError> {
        tracing::debug!(route = %route, max_output_tokens, "Requesting summary completion");

        match route.surface {
            ApiSurface::Chat => {
                self.complete_chat(&route.model, system_prompt, user_prompt, max_output_tokens)
                    .await
            }
            ApiSurface::Response => {
                self.complete_responses(&route.model, system_prompt, user_prompt, max_output_tokens)
                    .await
            }
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SummaryProviderError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SummaryProviderError::RateLimited);
    }
    if status.is_server_error() {
        return Err(SummaryProviderError::Server(status.as_u16()));
    }
    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body.chars().take(200).collect::<String>(), "Completion rejected");
        return Err(SummaryProviderError::Client(status.as_u16()));
    }
    Ok(response)
}

fn classify_transport_error(error: reqwest::Error) -> SummaryProviderError {
    if error.is_timeout() {
        SummaryProviderError::Timeout
    } else {
        SummaryProviderError::Network(error.to_string())
    }
}

/// A 200 that decodes but carries no usable text is a structural failure of
/// the route, not a transient one.
fn non_empty(content: Option<String>) -> Result<String, SummaryProviderError> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(SummaryProviderError::EmptyContent),
    }
}
