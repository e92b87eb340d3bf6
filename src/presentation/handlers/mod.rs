mod health;
mod webhook;

pub use health::health_handler;
pub use webhook::telegram_webhook_handler;
