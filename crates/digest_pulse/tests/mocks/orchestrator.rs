use digest_pulse::{SummarizerError, Summary, SummaryOrchestrator, VOICE_MESSAGE_URL};
use std::sync::{Arc, Mutex};

/// Records `summarize_text` calls for the voice pipeline
#[derive(Clone)]
pub struct MockOrchestrator {
    pub text_calls: Arc<Mutex<Vec<(String, bool)>>>,
    pub url_calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<SummarizerError>,
}

impl Default for MockOrchestrator {
    fn default() -> Self {
        Self {
            text_calls: Arc::new(Mutex::new(Vec::new())),
            url_calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockOrchestrator {
    pub fn failing(error: SummarizerError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    fn summary(&self, original_url: &str, was_truncated: bool) -> Result<Summary, SummarizerError> {
        if let Some(ref error) = self.fail_with {
            return Err(error.clone());
        }
        Ok(Summary {
            main_idea: "Speaker asks for a review".into(),
            key_points: vec!["Review the draft".into()],
            sentiment: "Request".into(),
            clickbait_score: 0,
            tags: vec!["work".into()],
            title: None,
            original_url: original_url.into(),
            was_truncated,
        })
    }
}

impl SummaryOrchestrator for MockOrchestrator {
    async fn process_summary_request(&self, url: &str) -> Result<Summary, SummarizerError> {
        self.url_calls.lock().unwrap().push(url.to_string());
        self.summary(url, false)
    }

    async fn summarize_text(&self, text: &str, was_truncated: bool) -> Result<Summary, SummarizerError> {
        self.text_calls
            .lock()
            .unwrap()
            .push((text.to_string(), was_truncated));
        self.summary(VOICE_MESSAGE_URL, was_truncated)
    }
}
