mod allowlist;
mod api_surface;
pub mod bot_messages;
mod ids;
mod summary_budget;
pub mod transcript;

pub use allowlist::Allowlist;
pub use api_surface::{escalation_order, ApiSurface, SummaryRoute};
pub use ids::{ChatId, FileId, MessageId};
pub use summary_budget::SummaryBudget;
