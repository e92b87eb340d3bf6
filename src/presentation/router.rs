use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{BotApi, SummaryProvider, TranscriptionProvider};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{health_handler, telegram_webhook_handler};
use crate::presentation::state::AppState;

pub fn create_router<P, S, B>(state: AppState<P, S, B>) -> Router
where
    P: TranscriptionProvider + 'static,
    S: SummaryProvider + 'static,
    B: BotApi + 'static,
{
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(health_handler))
        .route("/tg/{secret}", post(telegram_webhook_handler::<P, S, B>))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .with_state(state)
}
