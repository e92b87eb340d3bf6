use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::environment::Environment;
use crate::domain::Allowlist;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub telegram: TelegramSettings,
    pub speech: SpeechSettings,
    #[serde(default)]
    pub summary: SummarySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers the optional `appsettings.<environment>` file under `APP_*`
    /// environment variables, e.g. `APP_TELEGRAM__BOT_TOKEN` maps to
    /// `telegram.bot_token`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let configuration = Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Webhook mode registers the public endpoint; long polling is meant
    /// for local development without a reachable URL.
    #[serde(default = "default_true")]
    pub use_webhook: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            use_webhook: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    pub bot_token: String,
    /// Public HTTPS base the platform can reach, without a trailing slash.
    #[serde(default)]
    pub public_base_url: String,
    #[serde(default)]
    pub webhook_secret: String,
    /// Comma-separated user ids and usernames. Empty means nobody.
    #[serde(default)]
    pub allowlist: String,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl TelegramSettings {
    pub fn webhook_url(&self) -> String {
        format!(
            "{}/tg/{}",
            self.public_base_url.trim_end_matches('/'),
            self.webhook_secret
        )
    }

    pub fn parsed_allowlist(&self) -> Allowlist {
        Allowlist::from_csv(&self.allowlist)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_speech_primary")]
    pub model_primary: String,
    #[serde(default = "default_speech_fallback")]
    pub model_fallback: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarySettings {
    /// Absent key disables summarization entirely.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_summary_primary")]
    pub model_primary: String,
    #[serde(default = "default_summary_fallbacks")]
    pub model_fallbacks: Vec<String>,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model_primary: default_summary_primary(),
            model_fallbacks: default_summary_fallbacks(),
            timeout_secs: default_provider_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_read_timeout_secs() -> u64 {
    120
}

fn default_speech_primary() -> String {
    "whisper-large-v3-turbo".to_string()
}

fn default_speech_fallback() -> String {
    "whisper-large-v3".to_string()
}

fn default_language() -> String {
    "ru".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    60
}

fn default_summary_primary() -> String {
    "gpt-5-nano".to_string()
}

fn default_summary_fallbacks() -> Vec<String> {
    vec!["gpt-5-mini".to_string(), "gpt-4.1-mini".to_string()]
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::TelegramSettings;

    #[test]
    fn given_base_url_with_trailing_slash_when_building_webhook_url_then_path_is_clean() {
        let settings = TelegramSettings {
            bot_token: "token".to_string(),
            public_base_url: "https://bot.example.com/".to_string(),
            webhook_secret: "s3cret".to_string(),
            allowlist: String::new(),
            read_timeout_secs: 120,
        };

        assert_eq!(settings.webhook_url(), "https://bot.example.com/tg/s3cret");
    }
}
