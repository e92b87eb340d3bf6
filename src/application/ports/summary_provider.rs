use async_trait::async_trait;

use crate::domain::SummaryRoute;

#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// One completion call against one (surface, model) route. `Ok` always
    /// carries non-empty trimmed text; a 200 with nothing usable in it comes
    /// back as [`SummaryProviderError::EmptyContent`].
    async fn complete(
        &self,
        route: &SummaryRoute,
        system_prompt: &str,
        user_prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, SummaryProviderError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SummaryProviderError {
    #[error("rate limited")]
    RateLimited,
    #[error("server error: http {0}")]
    Server(u16),
    #[error("client error: http {0}")]
    Client(u16),
    #[error("completion came back empty or unparseable")]
    EmptyContent,
    #[error("completion request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("completion failed: {0}")]
    Unclassified(String),
}

impl SummaryProviderError {
    /// Transient failures worth another attempt under backoff. Everything
    /// else means the route itself is broken and retrying cannot help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Server(_) | Self::Timeout | Self::Network(_)
        )
    }

    /// Short wire-level cause for log fields.
    pub fn tag(&self) -> String {
        match self {
            Self::RateLimited => "429".to_string(),
            Self::Server(status) | Self::Client(status) => status.to_string(),
            Self::EmptyContent => "empty_content".to_string(),
            Self::Timeout => "timeout".to_string(),
            Self::Network(_) => "network_error".to_string(),
            Self::Unclassified(_) => "error".to_string(),
        }
    }
}
