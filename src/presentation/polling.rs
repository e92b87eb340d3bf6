use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{BotApi, SummaryProvider, TranscriptionProvider};
use crate::application::services::UpdateDispatcher;

/// Server-side hold time for one getUpdates long poll.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause before retrying after a failed poll, so a dead network does not
/// turn into a tight loop.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-polling front door for development runs without a public URL.
/// Each update is handled in its own task; a slow transcription never
/// stalls the poll loop.
pub async fn run_polling<P, S, B>(bot: Arc<B>, dispatcher: Arc<UpdateDispatcher<P, S, B>>)
where
    P: TranscriptionProvider + 'static,
    S: SummaryProvider + 'static,
    B: BotApi + 'static,
{
    tracing::info!("Starting long polling");
    let mut offset: Option<i64> = None;

    loop {
        let updates = match bot.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(error) => {
                tracing::error!(%error, "Polling for updates failed, backing off");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                dispatcher.dispatch(update).await;
            });
        }
    }
}
