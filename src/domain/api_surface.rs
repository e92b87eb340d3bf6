use std::fmt;

/// Request/response shape understood by the summarization backend. The same
/// provider exposes both; some deployments only accept one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiSurface {
    Chat,
    Response,
}

impl ApiSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiSurface::Chat => "chat_completions",
            ApiSurface::Response => "responses",
        }
    }
}

impl fmt::Display for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One (surface, model) step in the summarization escalation chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRoute {
    pub surface: ApiSurface,
    pub model: String,
}

impl SummaryRoute {
    pub fn new(surface: ApiSurface, model: impl Into<String>) -> Self {
        Self {
            surface,
            model: model.into(),
        }
    }
}

impl fmt::Display for SummaryRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.surface, self.model)
    }
}

/// Builds the full escalation order: the primary model on the chat surface,
/// each fallback model on the chat surface in declared order, then the first
/// fallback model on the alternate surface as a last resort.
pub fn escalation_order(primary: &str, fallbacks: &[String]) -> Vec<SummaryRoute> {
    let mut routes = Vec::with_capacity(fallbacks.len() + 2);
    routes.push(SummaryRoute::new(ApiSurface::Chat, primary));
    for model in fallbacks {
        routes.push(SummaryRoute::new(ApiSurface::Chat, model.clone()));
    }
    if let Some(first_fallback) = fallbacks.first() {
        routes.push(SummaryRoute::new(ApiSurface::Response, first_fallback.clone()));
    }
    routes
}
