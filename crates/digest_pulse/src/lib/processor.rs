pub mod builder;
pub mod voice;

use std::{any::Any, future::Future, panic::AssertUnwindSafe};

use futures::FutureExt;
use url::Url;

use crate::{
    extractor::ContentExtractor, ExtractedContent, Result, Summarizer, SummarizerError, Summary,
};

/// Entry points of the summarization pipeline
pub trait SummaryOrchestrator {
    /// Extracts the page behind `url` and summarizes it. Every failure, including
    /// a panic inside the pipeline, comes back as a [`SummarizerError`].
    fn process_summary_request(&self, url: &str) -> impl Future<Output = Result<Summary>> + Send;

    /// Summarizes already available text (a transcript) with the voice prompt
    fn summarize_text(
        &self,
        text: &str,
        was_truncated: bool,
    ) -> impl Future<Output = Result<Summary>> + Send;
}

/// Wires extraction into summarization
#[derive(Debug, Clone)]
pub struct SummaryProcessor<E, S>
where
    E: ContentExtractor + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    extractor: E,
    summarizer: S,
}

impl<E, S> SummaryProcessor<E, S>
where
    E: ContentExtractor + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    pub fn new(extractor: E, summarizer: S) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    /// Only absolute http(s) urls reach the fetcher
    fn validate_url(url: &str) -> Result<()> {
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            _ => Err(SummarizerError::ValidationError(format!(
                "Unsupported URL: {url}"
            ))),
        }
    }

    async fn run_pipeline(&self, url: &str) -> Result<Summary> {
        let content = self
            .extractor
            .extract_content(url)
            .await
            .inspect_err(|e| tracing::warn!(kind = e.kind(), error = %e, "Extraction failed"))?;

        tracing::info!(
            chars = content.text.chars().count(),
            truncated = content.was_truncated,
            "Content extracted"
        );

        self.summarizer
            .summarize(&content)
            .await
            .inspect_err(|e| tracing::warn!(kind = e.kind(), error = %e, "Summarization failed"))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "pipeline panicked".to_string())
}

impl<E, S> SummaryOrchestrator for SummaryProcessor<E, S>
where
    E: ContentExtractor + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self))]
    async fn process_summary_request(&self, url: &str) -> Result<Summary> {
        Self::validate_url(url)?;

        AssertUnwindSafe(self.run_pipeline(url))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                let cause = panic_message(payload.as_ref());
                tracing::error!(%cause, "Summary pipeline panicked");
                Err(SummarizerError::UnknownError(cause))
            })
    }

    #[tracing::instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn summarize_text(&self, text: &str, was_truncated: bool) -> Result<Summary> {
        let content = ExtractedContent::from_transcript(text, was_truncated);
        self.summarizer.summarize(&content).await
    }
}
