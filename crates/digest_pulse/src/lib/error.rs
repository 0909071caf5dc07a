//! Error taxonomy shared by every fallible pipeline step.

/// Result alias used across component boundaries.
pub type Result<T, E = SummarizerError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummarizerError {
    /// Fetch/transport failures, timeouts and HTTP status mapping
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Unextractable or too-short content
    #[error("Parsing error: {0}")]
    ParsingError(String),
    /// Provider transport, rate-limit, auth, malformed or empty completion
    #[error("AI error: {0}")]
    AIError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Catch-all for failures nobody anticipated; carries the cause description
    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl SummarizerError {
    /// Short category tag used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            SummarizerError::NetworkError(_) => "network",
            SummarizerError::ParsingError(_) => "parsing",
            SummarizerError::AIError(_) => "ai",
            SummarizerError::ValidationError(_) => "validation",
            SummarizerError::UnknownError(_) => "unknown",
        }
    }
}

/// Failures of the voice path. Download and size errors come from the audio
/// source, transcription errors from the speech-to-text provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("Download failed: {0}")]
    Download(String),
    #[error("File size limit exceeded: {0}")]
    FileSizeLimitExceeded(String),
    #[error("Transcription failed: {0}")]
    Transcription(String),
    #[error("Failed to summarize text: {0}")]
    Summarization(#[from] SummarizerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_carried_message() {
        let err = SummarizerError::NetworkError("Access denied (403)".into());
        assert_eq!(err.to_string(), "Network error: Access denied (403)");
        assert_eq!(err.kind(), "network");
    }

    #[test]
    fn test_summarizer_error_converts_into_voice_error() {
        let err: VoiceError = SummarizerError::AIError("Empty response from OpenAI".into()).into();
        assert_eq!(
            err,
            VoiceError::Summarization(SummarizerError::AIError(
                "Empty response from OpenAI".into()
            ))
        );
    }
}
