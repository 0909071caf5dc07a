use std::future::Future;

use crate::{ExtractedContent, Result, Summary};

pub trait Summarizer {
    /// Default ceiling on the characters sent to the provider, independent of
    /// the extraction-layer truncation
    const MAX_INPUT_CHARS: usize = 50_000;
    const SUMMARIZER_MODEL: &'static str;

    fn summarize(&self, content: &ExtractedContent) -> impl Future<Output = Result<Summary>> + Send;
}
