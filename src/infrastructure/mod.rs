pub mod llm;
pub mod observability;
pub mod speech;
pub mod telegram;
