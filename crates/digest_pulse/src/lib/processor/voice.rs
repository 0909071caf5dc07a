use std::future::Future;

use crate::{AudioInput, SummaryOrchestrator, Transcriber, VoiceError, VoiceProcessingResult};

pub const DEFAULT_SHORT_TEXT_THRESHOLD: usize = 50;
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 50_000;

/// Name the audio is uploaded under; the provider sniffs the format from it
pub const VOICE_FILE_NAME: &str = "voice.ogg";

/// Fetches the audio bytes behind a messaging-platform file reference
pub trait AudioDownloader {
    fn download(&self, file_id: &str) -> impl Future<Output = Result<Vec<u8>, VoiceError>> + Send;
}

pub trait VoiceOrchestrator {
    fn process_voice(
        &self,
        file_id: &str,
    ) -> impl Future<Output = Result<VoiceProcessingResult, VoiceError>> + Send;
}

/// Download, transcribe, then either echo a short transcript or hand a long one
/// to the summary pipeline
#[derive(Debug, Clone)]
pub struct VoiceProcessor<D, T, O>
where
    D: AudioDownloader + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    O: SummaryOrchestrator + Send + Sync + 'static,
{
    pub(crate) downloader: D,
    pub(crate) transcriber: T,
    pub(crate) orchestrator: O,
    pub(crate) short_text_threshold: usize,
    pub(crate) max_text_length: usize,
}

impl<D, T, O> VoiceProcessor<D, T, O>
where
    D: AudioDownloader + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    O: SummaryOrchestrator + Send + Sync + 'static,
{
    pub fn short_text_threshold(&self) -> usize {
        self.short_text_threshold
    }

    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }
}

impl<D, T, O> VoiceOrchestrator for VoiceProcessor<D, T, O>
where
    D: AudioDownloader + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    O: SummaryOrchestrator + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self))]
    async fn process_voice(&self, file_id: &str) -> Result<VoiceProcessingResult, VoiceError> {
        let bytes = self
            .downloader
            .download(file_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to download voice message"))?;

        tracing::debug!(bytes = bytes.len(), "Voice message downloaded");

        let transcript = self
            .transcriber
            .transcribe(AudioInput::new(bytes, VOICE_FILE_NAME))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to transcribe voice message");
                VoiceError::Transcription(e.to_string())
            })?;

        let text = transcript.text;
        let length = text.chars().count();

        if length < self.short_text_threshold {
            tracing::info!(length, "Short transcript, skipping summary");
            return Ok(VoiceProcessingResult::ShortMessage(text));
        }

        let was_truncated = length > self.max_text_length;
        let capped = if was_truncated {
            tracing::warn!(length, max = self.max_text_length, "Transcript capped for summary");
            text.chars().take(self.max_text_length).collect::<String>()
        } else {
            text.clone()
        };

        let summary = self.orchestrator.summarize_text(&capped, was_truncated).await?;

        Ok(VoiceProcessingResult::LongMessageWithSummary {
            raw_text: text,
            summary,
        })
    }
}
