use std::sync::Arc;

use crate::application::ports::{BotApi, SummaryProvider, TranscriptionProvider};
use crate::application::services::UpdateDispatcher;

pub struct AppState<P, S, B>
where
    P: TranscriptionProvider,
    S: SummaryProvider,
    B: BotApi,
{
    pub dispatcher: Arc<UpdateDispatcher<P, S, B>>,
    pub webhook_secret: String,
}

impl<P, S, B> Clone for AppState<P, S, B>
where
    P: TranscriptionProvider,
    S: SummaryProvider,
    B: BotApi,
{
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            webhook_secret: self.webhook_secret.clone(),
        }
    }
}
