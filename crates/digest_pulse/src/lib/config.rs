use clap::Parser;

use crate::extractor::ExtractorConfig;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Parser)]
#[command(name = "digest-pulse", about = "Telegram bot that summarizes links and voice messages")]
pub struct BotConfig {
    /// Telegram Bot API token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// OpenAI API key, used for both summaries and transcription
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_key: String,

    /// User-Agent sent on direct page fetches
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// ZenRows key; enables the proxy fallback for blocked pages
    #[arg(long, env = "ZENROWS_API_KEY", hide_env_values = true)]
    pub zenrows_api_key: Option<String>,

    /// Cookie header sent on direct page fetches
    #[arg(long, env = "SCRAPER_COOKIE", hide_env_values = true)]
    pub scraper_cookie: Option<String>,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub openai_model: String,

    /// ISO-639-1 language hint for speech-to-text
    #[arg(long, env = "TRANSCRIPTION_LANGUAGE", default_value = "ru")]
    pub transcription_language: String,

    /// Language every summary is written in, whatever the source language
    #[arg(long, env = "SUMMARY_LANGUAGE", default_value = "Russian")]
    pub summary_language: String,

    /// Transcripts shorter than this (in characters) are echoed without a summary
    #[arg(long, env = "SHORT_TEXT_THRESHOLD", default_value_t = 50)]
    pub short_text_threshold: usize,

    /// Upper bound (in characters) on extracted pages and summarized transcripts
    #[arg(long, env = "MAX_TEXT_LENGTH", default_value_t = 50_000)]
    pub max_text_length: usize,

    /// Upper bound (in characters) on the text sent to the completion endpoint
    #[arg(long, env = "AI_MAX_INPUT_CHARS", default_value_t = 50_000)]
    pub ai_max_input_chars: usize,

    /// Largest voice/audio file accepted for transcription
    #[arg(long, env = "MAX_AUDIO_FILE_MB", default_value_t = 20)]
    pub max_audio_file_mb: u64,

    /// Long-polling timeout for getUpdates, in seconds
    #[arg(long, env = "TELEGRAM_POLL_TIMEOUT", default_value_t = 30)]
    pub poll_timeout: u64,
}

impl BotConfig {
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            proxy_api_key: self.zenrows_api_key.clone().filter(|k| !k.trim().is_empty()),
            max_content_length: self.max_text_length,
            ..ExtractorConfig::default()
        }
    }

    pub fn max_audio_bytes(&self) -> u64 {
        self.max_audio_file_mb * 1024 * 1024
    }
}
