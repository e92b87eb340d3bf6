use std::sync::{Arc, Mutex};
use std::time::Duration;

use voxrelay::application::ports::{SummaryProvider, SummaryProviderError};
use voxrelay::application::services::{RetryPolicy, SummaryService};
use voxrelay::domain::{escalation_order, ApiSurface, SummaryRoute};

/// Provider fake returning a scripted sequence of outcomes while recording
/// every route it was asked to complete on.
struct ScriptedProvider {
    script: Mutex<Vec<Result<String, SummaryProviderError>>>,
    routes_called: Mutex<Vec<SummaryRoute>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<String, SummaryProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            routes_called: Mutex::new(Vec::new()),
        })
    }

    fn routes_called(&self) -> Vec<SummaryRoute> {
        self.routes_called.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.routes_called.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SummaryProvider for ScriptedProvider {
    async fn complete(
        &self,
        route: &SummaryRoute,
        _system_prompt: &str,
        _user_prompt: &str,
        _max_output_tokens: u32,
    ) -> Result<String, SummaryProviderError> {
        self.routes_called.lock().unwrap().push(route.clone());
        let mut script = self.script.lock().unwrap();
        assert!(!script.is_empty(), "provider called more often than scripted");
        script.remove(0)
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(5, Duration::from_millis(1))
}

fn two_route_service(provider: Arc<ScriptedProvider>) -> SummaryService<ScriptedProvider> {
    let routes = vec![
        SummaryRoute::new(ApiSurface::Chat, "model-a"),
        SummaryRoute::new(ApiSurface::Chat, "model-b"),
    ];
    SummaryService::new(provider, routes, fast_retry())
}

#[tokio::test]
async fn given_blank_input_when_summarizing_then_no_provider_call_is_made() {
    let provider = ScriptedProvider::new(vec![]);
    let service = two_route_service(Arc::clone(&provider));

    assert_eq!(service.summarize("").await, None);
    assert_eq!(service.summarize("   ").await, None);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn given_first_route_success_when_summarizing_then_chain_stops_immediately() {
    let provider = ScriptedProvider::new(vec![Ok("краткое саммари".to_string())]);
    let service = two_route_service(Arc::clone(&provider));

    let summary = service.summarize("текст встречи о планах").await;

    assert_eq!(summary.as_deref(), Some("краткое саммари"));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn given_four_server_errors_then_success_when_summarizing_then_exactly_five_attempts() {
    let provider = ScriptedProvider::new(vec![
        Err(SummaryProviderError::Server(503)),
        Err(SummaryProviderError::Server(503)),
        Err(SummaryProviderError::Server(503)),
        Err(SummaryProviderError::Server(503)),
        Ok("ответ после повторов".to_string()),
    ]);
    let service = two_route_service(Arc::clone(&provider));

    let summary = service.summarize("текст").await;

    assert_eq!(summary.as_deref(), Some("ответ после повторов"));
    let routes = provider.routes_called();
    assert_eq!(routes.len(), 5);
    assert!(routes.iter().all(|r| r.model == "model-a"));
}

#[tokio::test]
async fn given_client_error_when_summarizing_then_route_is_abandoned_without_retry() {
    let provider = ScriptedProvider::new(vec![
        Err(SummaryProviderError::Client(400)),
        Ok("саммари со второй модели".to_string()),
    ]);
    let service = two_route_service(Arc::clone(&provider));

    let summary = service.summarize("текст").await;

    assert_eq!(summary.as_deref(), Some("саммари со второй модели"));
    let routes = provider.routes_called();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].model, "model-a");
    assert_eq!(routes[1].model, "model-b");
}

#[tokio::test]
async fn given_empty_content_when_summarizing_then_next_route_is_tried_without_retry() {
    let provider = ScriptedProvider::new(vec![
        Err(SummaryProviderError::EmptyContent),
        Ok("непустой ответ".to_string()),
    ]);
    let service = two_route_service(Arc::clone(&provider));

    let summary = service.summarize("текст").await;

    assert_eq!(summary.as_deref(), Some("непустой ответ"));
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn given_whitespace_only_completion_when_summarizing_then_route_is_abandoned() {
    let provider = ScriptedProvider::new(vec![
        Ok("   \n".to_string()),
        Ok("настоящее саммари".to_string()),
    ]);
    let service = two_route_service(Arc::clone(&provider));

    let summary = service.summarize("текст").await;

    assert_eq!(summary.as_deref(), Some("настоящее саммари"));
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn given_rate_limits_on_every_attempt_when_summarizing_then_all_routes_exhaust_and_none() {
    let provider = ScriptedProvider::new(vec![
        Err(SummaryProviderError::RateLimited);
        10
    ]);
    let service = two_route_service(Arc::clone(&provider));

    let summary = service.summarize("текст").await;

    assert_eq!(summary, None);
    // 5 bounded attempts per route, both routes exhausted.
    assert_eq!(provider.call_count(), 10);
}

#[tokio::test]
async fn given_unclassified_error_when_summarizing_then_route_aborts_without_retry() {
    let provider = ScriptedProvider::new(vec![
        Err(SummaryProviderError::Unclassified("broken pipe in disguise".to_string())),
        Ok("запасной ответ".to_string()),
    ]);
    let service = two_route_service(Arc::clone(&provider));

    let summary = service.summarize("текст").await;

    assert_eq!(summary.as_deref(), Some("запасной ответ"));
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn given_client_errors_everywhere_when_summarizing_then_routes_follow_escalation_order() {
    let routes = escalation_order("gpt-primary", &["gpt-fb1".to_string(), "gpt-fb2".to_string()]);
    let provider = ScriptedProvider::new(vec![Err(SummaryProviderError::Client(404)); 4]);
    let service = SummaryService::new(Arc::clone(&provider), routes.clone(), fast_retry());

    let summary = service.summarize("текст").await;

    assert_eq!(summary, None);
    assert_eq!(provider.routes_called(), routes);
    // Last resort is the alternate surface with the first fallback model.
    let last = provider.routes_called().pop().unwrap();
    assert_eq!(last.surface, ApiSurface::Response);
    assert_eq!(last.model, "gpt-fb1");
}

#[tokio::test]
async fn given_surviving_summary_when_summarizing_then_output_is_trimmed() {
    let provider = ScriptedProvider::new(vec![Ok("  итог с пробелами  ".to_string())]);
    let service = two_route_service(Arc::clone(&provider));

    let summary = service.summarize("текст").await;

    assert_eq!(summary.as_deref(), Some("итог с пробелами"));
}
