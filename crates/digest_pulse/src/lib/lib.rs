pub mod config;
mod error;
pub mod extractor;
pub mod formatter;
pub mod links;
mod llm;
mod processor;
pub mod telegram;
pub mod tracing;
pub mod types;

pub use error::{Result, SummarizerError, VoiceError};
pub use extractor::{
    ArticleExtractor, ContentExtractor, ExtractorConfig, FetchError, FetchedPage,
    HttpPageFetcher, PageFetcher,
};
pub use llm::{openai, prompts};
pub use llm::{
    summarizer::Summarizer,
    transcriber::{AudioInput, TranscribeResponse, Transcriber},
};
pub use processor::{
    builder::VoiceProcessorBuilder,
    voice::{AudioDownloader, VoiceOrchestrator, VoiceProcessor, VOICE_FILE_NAME},
    SummaryOrchestrator, SummaryProcessor,
};
pub use types::{
    ContentOrigin, ExtractedContent, LinkType, Summary, VoiceProcessingResult, VOICE_MESSAGE_URL,
};
