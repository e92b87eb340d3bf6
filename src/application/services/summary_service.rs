use std::sync::Arc;

use crate::application::ports::{SummaryProvider, SummaryProviderError};
use crate::application::services::retry::RetryPolicy;
use crate::domain::transcript;
use crate::domain::{SummaryBudget, SummaryRoute};

const SYSTEM_PROMPT: &str = "Ты аналитик и редактор, который делает точные, краткие и полезные \
саммари русскоязычных транскрибатов аудио/видео. \
Всегда пиши ТОЛЬКО на русском. \
Не придумывай факты; если данных нет, явно укажи «нет данных». \
Сохраняй имена, даты, цифры и формулировки решений.";

fn build_user_prompt(transcription: &str) -> String {
    format!(
        "Суммируй транскрибированный текст аудио/видео.\n\
         Адаптируй объём и детализацию под длину текста: короткий (до 10 мин), средний (10–60 мин), длинный (60–120+ мин).\n\
         \n\
         ТРЕБОВАНИЯ:\n\
         — Язык: русский.\n\
         — Тон: нейтральный, деловой, без эмодзи.\n\
         — Структура (если применимо):\n\
         \x20\x201) TL;DR (1–3 предложения).\n\
         \x20\x202) Основные темы и тезисы (буллеты).\n\
         \x20\x203) Принятые решения и договорённости (если была встреча/созвон).\n\
         \x20\x204) Action items: кто → что → срок (если указано/подразумевается).\n\
         \x20\x205) Цифры/метрики/сроки/имена (сохранить точные значения).\n\
         \x20\x206) Риски/неопределённости/вопросы без ответа.\n\
         \x20\x207) Если в тексте есть таймкоды — «Хайлайты по времени» (список кратких моментов с таймкодами). Если таймкодов нет — пропусти этот раздел.\n\
         — Краткость важнее дословных пересказов. Убирай повторы и «водные» вставки.\n\
         — Ничего не выдумывай. Если чего-то нет в тексте — пиши «нет данных».\n\
         \n\
         Текст:\n\
         <<<TRANSCRIPT_START\n\
         {transcription}\n\
         TRANSCRIPT_END>>>"
    )
}

/// Best-effort summarization over an ordered chain of (surface, model)
/// routes. A summary is an enhancement: this service never returns an error,
/// it either produces text or gives up quietly after logging why.
pub struct SummaryService<P>
where
    P: SummaryProvider,
{
    provider: Arc<P>,
    routes: Vec<SummaryRoute>,
    retry: RetryPolicy,
}

impl<P> SummaryService<P>
where
    P: SummaryProvider,
{
    pub fn new(provider: Arc<P>, routes: Vec<SummaryRoute>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            routes,
            retry,
        }
    }

    /// Walks the route chain and returns the first non-empty summary.
    /// Empty or whitespace-only input short-circuits to `None` without any
    /// network call.
    pub async fn summarize(&self, transcription: &str) -> Option<String> {
        if transcription.trim().is_empty() {
            tracing::warn!("Empty transcription, skipping summarization");
            return None;
        }

        let words = transcript::word_count(transcription);
        let budget = SummaryBudget::from_word_count(words);
        let user_prompt = build_user_prompt(transcription);
        tracing::debug!(words, budget = %budget, routes = self.routes.len(), "Starting summarization");

        for route in &self.routes {
            if let Some(summary) = self.try_route(route, &user_prompt, budget).await {
                return Some(summary);
            }
        }

        tracing::warn!("All summarization routes exhausted");
        None
    }

    /// Runs one route under the retry policy. Transient failures back off
    /// and retry up to the attempt ceiling; anything else abandons the route
    /// so the chain can move on.
    async fn try_route(
        &self,
        route: &SummaryRoute,
        user_prompt: &str,
        budget: SummaryBudget,
    ) -> Option<String> {
        let mut last_error: Option<SummaryProviderError> = None;

        for attempt in 1..=self.retry.max_attempts() {
            match self
                .provider
                .complete(route, SYSTEM_PROMPT, user_prompt, budget.max_output_tokens())
                .await
            {
                Ok(text) => {
                    let summary = text.trim();
                    if summary.is_empty() {
                        tracing::warn!(route = %route, attempt, "Summary came back blank, abandoning route");
                        return None;
                    }
                    tracing::info!(
                        route = %route,
                        attempt,
                        chars = summary.chars().count(),
                        "Summary generated"
                    );
                    return Some(summary.to_string());
                }
                Err(error) if error.is_retryable() && attempt < self.retry.max_attempts() => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(
                        route = %route,
                        attempt,
                        error_tag = %error.tag(),
                        delay_ms = delay.as_millis() as u64,
                        "Transient summarization failure, backing off"
                    );
                    last_error = Some(error);
                    tokio::time::sleep(delay).await;
                }
                Err(error) if error.is_retryable() => {
                    last_error = Some(error);
                }
                Err(error) => {
                    tracing::warn!(
                        route = %route,
                        attempt,
                        error_tag = %error.tag(),
                        "Abandoning summarization route"
                    );
                    return None;
                }
            }
        }

        let tag = last_error
            .map(|e| e.tag())
            .unwrap_or_else(|| "error".to_string());
        tracing::warn!(
            route = %route,
            attempts = self.retry.max_attempts(),
            error_tag = %tag,
            "Summarization route exhausted its retries"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::build_user_prompt;

    #[test]
    fn given_transcription_when_building_prompt_then_text_is_fenced_by_markers() {
        let prompt = build_user_prompt("привет мир");

        assert!(prompt.contains("<<<TRANSCRIPT_START\nпривет мир\nTRANSCRIPT_END>>>"));
        assert!(prompt.starts_with("Суммируй"));
    }
}
