use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::{BotApi, SummaryProvider, TranscriptionProvider, Update};
use crate::infrastructure::observability::sanitize_for_log;
use crate::presentation::state::AppState;

const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Serialize)]
pub struct WebhookAck {
    pub status: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Receives one update from the platform. The path segment doubles as a
/// shared secret: an unknown value is indistinguishable from an unknown
/// route, and the platform additionally signs each delivery with a header
/// token that must match.
#[tracing::instrument(skip_all)]
pub async fn telegram_webhook_handler<P, S, B>(
    State(state): State<AppState<P, S, B>>,
    Path(secret): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    P: TranscriptionProvider + 'static,
    S: SummaryProvider + 'static,
    B: BotApi + 'static,
{
    if secret != state.webhook_secret {
        tracing::warn!("Webhook called with unknown path secret");
        return StatusCode::NOT_FOUND.into_response();
    }

    let header_token = headers
        .get(SECRET_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if header_token != Some(state.webhook_secret.as_str()) {
        tracing::warn!("Webhook called with an invalid secret token header");
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                detail: "Invalid secret token".to_string(),
            }),
        )
            .into_response();
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(error) => {
            tracing::warn!(%error, body = %sanitize_for_log(&String::from_utf8_lossy(&body)), "Webhook payload rejected");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    detail: "Invalid update payload".to_string(),
                }),
            )
                .into_response();
        }
    };

    state.dispatcher.dispatch(update).await;

    (
        StatusCode::OK,
        Json(WebhookAck {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}
