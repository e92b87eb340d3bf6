use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use voxrelay::application::ports::BotApi;
use voxrelay::application::services::{
    RetryPolicy, SummaryService, TranscriptionModels, TranscriptionService, UpdateDispatcher,
};
use voxrelay::domain::escalation_order;
use voxrelay::infrastructure::llm::OpenAiSummaryClient;
use voxrelay::infrastructure::observability::{init_tracing, TracingConfig};
use voxrelay::infrastructure::speech::GroqSpeechClient;
use voxrelay::infrastructure::telegram::TelegramBotApi;
use voxrelay::presentation::{create_router, run_polling, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment =
        Environment::detect().map_err(|e| anyhow::anyhow!("Invalid APP_ENVIRONMENT: {}", e))?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.json,
        level: settings.logging.level.clone(),
    });

    let speech_client = Arc::new(GroqSpeechClient::new(
        settings.speech.api_key.clone(),
        settings.speech.base_url.clone(),
        settings.speech.language.clone(),
        Duration::from_secs(settings.speech.timeout_secs),
    ));
    let transcription_service = Arc::new(TranscriptionService::new(
        speech_client,
        TranscriptionModels {
            primary: settings.speech.model_primary.clone(),
            fallback: settings.speech.model_fallback.clone(),
        },
    ));

    let summary_service: Option<Arc<SummaryService<OpenAiSummaryClient>>> =
        match &settings.summary.api_key {
            Some(api_key) if !api_key.trim().is_empty() => {
                let client = Arc::new(OpenAiSummaryClient::new(
                    api_key.clone(),
                    settings.summary.base_url.clone(),
                    Duration::from_secs(settings.summary.timeout_secs),
                ));
                let routes = escalation_order(
                    &settings.summary.model_primary,
                    &settings.summary.model_fallbacks,
                );
                Some(Arc::new(SummaryService::new(
                    client,
                    routes,
                    RetryPolicy::new(
                        settings.summary.max_attempts,
                        Duration::from_millis(settings.summary.backoff_base_ms),
                    ),
                )))
            }
            _ => {
                tracing::info!("Summarization disabled: no API key configured");
                None
            }
        };

    let bot = Arc::new(TelegramBotApi::new(
        settings.telegram.bot_token.clone(),
        None,
        Duration::from_secs(settings.telegram.read_timeout_secs),
    ));
    let dispatcher = Arc::new(UpdateDispatcher::new(
        Arc::clone(&bot),
        transcription_service,
        summary_service,
        settings.telegram.parsed_allowlist(),
    ));

    if settings.server.use_webhook {
        bot.set_webhook(
            &settings.telegram.webhook_url(),
            &settings.telegram.webhook_secret,
        )
        .await
        .context("Failed to register webhook")?;

        let state = AppState {
            dispatcher,
            webhook_secret: settings.telegram.webhook_secret.clone(),
        };
        let router = create_router(state);

        let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
            .parse()
            .context("Invalid server address")?;
        tracing::info!("Listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;
    } else {
        bot.delete_webhook()
            .await
            .context("Failed to remove webhook")?;
        run_polling(bot, dispatcher).await;
    }

    Ok(())
}
