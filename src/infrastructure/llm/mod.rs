mod openai_summary_client;

pub use openai_summary_client::OpenAiSummaryClient;
