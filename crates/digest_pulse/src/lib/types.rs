use serde::{Deserialize, Serialize};

/// Source url recorded for content that came from a transcribed voice message
pub const VOICE_MESSAGE_URL: &str = "voice_message";

/// Semantic category of a link, decides which analysis prompt is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Candidate,
    Job,
    Company,
    Unknown,
}

/// Where a piece of content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Web(LinkType),
    Voice,
}

/// Clean text produced by the extraction engine (or the raw-text entry point)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    pub title: Option<String>,
    pub source_url: String,
    pub was_truncated: bool,
    pub origin: ContentOrigin,
}

impl ExtractedContent {
    /// Content built from a voice transcript
    pub fn from_transcript(text: impl Into<String>, was_truncated: bool) -> Self {
        Self {
            text: text.into(),
            title: None,
            source_url: VOICE_MESSAGE_URL.to_string(),
            was_truncated,
            origin: ContentOrigin::Voice,
        }
    }

    pub fn is_voice(&self) -> bool {
        self.origin == ContentOrigin::Voice
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub main_idea: String,
    pub key_points: Vec<String>,
    pub sentiment: String,
    /// Always within `0..=10`
    pub clickbait_score: u8,
    pub tags: Vec<String>,
    pub title: Option<String>,
    pub original_url: String,
    pub was_truncated: bool,
}

impl Summary {
    pub fn is_voice(&self) -> bool {
        self.original_url == VOICE_MESSAGE_URL
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceProcessingResult {
    /// Transcript under the short-text threshold, echoed verbatim
    ShortMessage(String),
    /// Full transcript plus the summary of its (possibly capped) text
    LongMessageWithSummary { raw_text: String, summary: Summary },
}
