use digest_pulse::{ExtractedContent, Summarizer, SummarizerError, Summary};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockSummarizer {
    pub main_idea: String,
    pub calls: Arc<Mutex<Vec<ExtractedContent>>>,
    pub fail_with: Option<SummarizerError>,
}

impl MockSummarizer {
    pub fn new(main_idea: &str) -> Self {
        Self {
            main_idea: main_idea.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(error: SummarizerError) -> Self {
        Self {
            main_idea: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(error),
        }
    }
}

impl Summarizer for MockSummarizer {
    const SUMMARIZER_MODEL: &'static str = "mock-gpt";

    async fn summarize(&self, content: &ExtractedContent) -> Result<Summary, SummarizerError> {
        self.calls.lock().unwrap().push(content.clone());
        if let Some(ref error) = self.fail_with {
            return Err(error.clone());
        }
        Ok(Summary {
            main_idea: self.main_idea.clone(),
            key_points: vec!["Point 1".into(), "Point 2".into()],
            sentiment: "Neutral".into(),
            clickbait_score: 1,
            tags: vec!["test".into()],
            title: content.title.clone(),
            original_url: content.source_url.clone(),
            was_truncated: content.was_truncated,
        })
    }
}
