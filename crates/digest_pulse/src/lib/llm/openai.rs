use reqwest::Client;
use serde::Deserialize;

use crate::{
    llm::prompts, AudioInput, ExtractedContent, Result, Summarizer, SummarizerError, Summary,
    TranscribeResponse, Transcriber,
};

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    language: String,
    output_language: String,
    max_input_chars: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response format from OpenAI: {0}")]
    Decode(#[from] serde_json::Error),
}

impl OpenAIClient {
    const DEFAULT_LANGUAGE: &str = "ru";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
            model: <Self as Summarizer>::SUMMARIZER_MODEL.into(),
            language: Self::DEFAULT_LANGUAGE.into(),
            output_language: prompts::DEFAULT_OUTPUT_LANGUAGE.into(),
            max_input_chars: <Self as Summarizer>::MAX_INPUT_CHARS,
        }
    }

    /// Reuse an already configured (and shared) http client
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Language the summaries are written in
    pub fn with_output_language(mut self, output_language: impl Into<String>) -> Self {
        self.output_language = output_language.into();
        self
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Builds the chat completion body: system prompt chosen by the content's
    /// origin, user message capped at `max_input_chars`, JSON mode forced.
    pub fn build_completion_body(&self, content: &ExtractedContent) -> serde_json::Value {
        let char_count = content.text.chars().count();
        let user_content: String = if char_count > self.max_input_chars {
            tracing::warn!(
                chars = char_count,
                cap = self.max_input_chars,
                "Capping content sent to OpenAI"
            );
            content.text.chars().take(self.max_input_chars).collect()
        } else {
            content.text.clone()
        };

        serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": prompts::system_message(content.origin, &self.output_language)
                },
                {
                    "role": "user",
                    "content": user_content
                }
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.7
        })
    }

    pub async fn send_transcribe_request(
        &self,
        input: AudioInput,
        model_name: impl Into<String>,
    ) -> Result<TranscribeResponse, OpenAIError> {
        let part = reqwest::multipart::Part::bytes(input.bytes)
            .file_name(input.file_name)
            .mime_str("audio/ogg")?;

        let form = reqwest::multipart::Form::new()
            .text("model", model_name.into())
            .text("language", self.language.clone())
            .text("response_format", "json")
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        let response = resp.json::<TranscribeResponse>().await?;

        Ok(response)
    }

    pub async fn send_completion_request(
        &self,
        body: &serde_json::Value,
    ) -> Result<CompletionResponse, OpenAIError> {
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("Unable to read error body: {e}"));
            tracing::error!(status, body = %message, "OpenAI API error");
            return Err(OpenAIError::Api { status, message });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str::<CompletionResponse>(&text)?)
    }
}

/// Maps a non-2xx completion status to the user-facing AI error
pub fn api_status_error(status: u16) -> SummarizerError {
    let message = match status {
        429 => "OpenAI rate limit exceeded. Please try again later.".to_string(),
        401 => "OpenAI authentication failed. Check the API key.".to_string(),
        500..=599 => "OpenAI is temporarily unavailable. Please try again later.".to_string(),
        other => format!("OpenAI API error (status {other})"),
    };
    SummarizerError::AIError(message)
}

impl From<OpenAIError> for SummarizerError {
    fn from(error: OpenAIError) -> Self {
        match error {
            OpenAIError::Api { status, .. } => api_status_error(status),
            OpenAIError::Decode(e) => {
                SummarizerError::AIError(format!("Invalid response format from OpenAI: {e}"))
            }
            OpenAIError::Request(e) => SummarizerError::AIError(e.to_string()),
        }
    }
}

/// Turns a completion into a [`Summary`], copying provenance from `content`
pub fn decode_summary(response: &CompletionResponse, content: &ExtractedContent) -> Result<Summary> {
    let payload = response
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| SummarizerError::AIError("Empty response from OpenAI".into()))?;

    let dto = serde_json::from_str::<SummaryDto>(strip_markdown_json(payload)).map_err(|e| {
        tracing::error!(error = %e, "Failed to decode summary payload");
        SummarizerError::AIError(format!("Invalid summary format from OpenAI: {e}"))
    })?;

    let clickbait_score = if content.is_voice() {
        0
    } else {
        dto.clickbait_score.round().clamp(0.0, 10.0) as u8
    };

    Ok(Summary {
        main_idea: dto.main_idea,
        key_points: dto.key_points,
        sentiment: dto.sentiment,
        clickbait_score,
        tags: dto.tags,
        title: content.title.clone(),
        original_url: content.source_url.clone(),
        was_truncated: content.was_truncated,
    })
}

/// JSON mode should never wrap output in a code fence, some models still do
fn strip_markdown_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.rfind("```").map(|end| rest[..end].trim()).unwrap_or(trimmed)
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDto {
    main_idea: String,
    key_points: Vec<String>,
    sentiment: String,
    clickbait_score: f64,
    #[serde(default)]
    tags: Vec<String>,
}

impl Transcriber for OpenAIClient {
    const TRANSCRIBER_MODEL: &'static str = "whisper-1";
    type Error = OpenAIError;

    #[tracing::instrument(skip_all, fields(bytes = audio_input.bytes.len()))]
    async fn transcribe(&self, audio_input: AudioInput) -> Result<TranscribeResponse, Self::Error> {
        self.send_transcribe_request(audio_input, Self::TRANSCRIBER_MODEL)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to transcribe audio"))
    }
}

impl Summarizer for OpenAIClient {
    const SUMMARIZER_MODEL: &'static str = "gpt-4o-mini";

    #[tracing::instrument(skip_all, fields(url = %content.source_url, chars = content.text.len()))]
    async fn summarize(&self, content: &ExtractedContent) -> Result<Summary> {
        let body = self.build_completion_body(content);

        let response = self
            .send_completion_request(&body)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        decode_summary(&response, content)
    }
}
