use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    telegram::types::{ApiResponse, TelegramFile, Update},
    AudioDownloader, VoiceError,
};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("{0}")]
    Request(reqwest::Error),
    #[error("Telegram API error ({code}): {description}")]
    Api { code: i64, description: String },
    #[error("Telegram server returned HTTP {0}")]
    Status(u16),
}

// request urls carry the bot token
impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        TelegramError::Request(e.without_url())
    }
}

impl TelegramError {
    fn is_markdown_rejection(&self) -> bool {
        matches!(self, TelegramError::Api { code: 400, description } if description.contains("can't parse entities"))
    }
}

/// Minimal Bot API client over JSON/HTTPS
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    token: String,
    base_url: String,
    max_file_bytes: u64,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            token: token.into(),
            base_url: "https://api.telegram.org".into(),
            max_file_bytes: 20 * BYTES_PER_MB,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Largest file [`AudioDownloader::download`] accepts
    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(format!("{}/bot{}/{method}", self.base_url, self.token))
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let envelope = request.send().await?.json::<ApiResponse<T>>().await?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(TelegramError::Api {
                code: error_code.unwrap_or_default(),
                description: description.unwrap_or_else(|| "no description".into()),
            }),
        }
    }

    /// Long-polls for updates after `offset`, waiting up to `timeout` seconds
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, TelegramError> {
        let body = serde_json::json!({
            "offset": offset,
            "timeout": timeout,
            "allowed_updates": ["message"]
        });
        // leave the server time to answer an idle poll before giving up
        let request_timeout = Duration::from_secs(timeout + 10);

        self.call("getUpdates", &body, Some(request_timeout)).await
    }

    /// Sends Markdown with link previews off. Text Telegram refuses to parse as
    /// Markdown is sent again as plain text.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": true
        });

        match self.call::<_, serde_json::Value>("sendMessage", &body, None).await {
            Err(e) if e.is_markdown_rejection() => {
                tracing::warn!(chat_id, "Markdown rejected, sending plain text");
                self.send_plain_message(chat_id, text).await
            }
            other => other.map(|_| ()),
        }
    }

    pub async fn send_plain_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true
        });

        self.call::<_, serde_json::Value>("sendMessage", &body, None)
            .await
            .map(|_| ())
    }

    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<(), TelegramError> {
        let body = serde_json::json!({ "chat_id": chat_id, "action": action });
        self.call::<_, bool>("sendChatAction", &body, None).await.map(|_| ())
    }

    pub async fn get_file(&self, file_id: &str) -> Result<TelegramFile, TelegramError> {
        let body = serde_json::json!({ "file_id": file_id });
        self.call("getFile", &body, None).await
    }

    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>, TelegramError> {
        let resp = self
            .client
            .get(format!("{}/file/bot{}/{file_path}", self.base_url, self.token))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(TelegramError::Status(resp.status().as_u16()));
        }

        Ok(resp.bytes().await?.to_vec())
    }

    fn size_limit_error(&self, size: u64) -> VoiceError {
        VoiceError::FileSizeLimitExceeded(format!(
            "File is {:.1} MB, the limit is {} MB",
            size as f64 / BYTES_PER_MB as f64,
            self.max_file_bytes / BYTES_PER_MB
        ))
    }
}

impl AudioDownloader for TelegramClient {
    #[tracing::instrument(skip(self))]
    async fn download(&self, file_id: &str) -> Result<Vec<u8>, VoiceError> {
        let file = self
            .get_file(file_id)
            .await
            .map_err(|e| VoiceError::Download(format!("Telegram API error: {e}")))?;

        let size = file.file_size.unwrap_or_default();
        if size > self.max_file_bytes {
            tracing::warn!(size, max = self.max_file_bytes, "Audio file too large");
            return Err(self.size_limit_error(size));
        }

        let path = file
            .file_path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| VoiceError::Download("File path is empty".into()))?;

        let bytes = self
            .download_file(&path)
            .await
            .map_err(|e| VoiceError::Download(format!("File download failed: {e}")))?;

        // file_size is optional in getFile, so the body is checked as well
        if bytes.len() as u64 > self.max_file_bytes {
            return Err(self.size_limit_error(bytes.len() as u64));
        }

        Ok(bytes)
    }
}
