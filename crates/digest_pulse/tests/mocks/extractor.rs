use digest_pulse::{ContentExtractor, ExtractedContent, SummarizerError};
use std::sync::{Arc, Mutex};

pub enum Behaviour {
    Succeed(ExtractedContent),
    Fail(SummarizerError),
    Panic(&'static str),
}

pub struct MockExtractor {
    pub behaviour: Behaviour,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockExtractor {
    pub fn new(content: ExtractedContent) -> Self {
        Self::with(Behaviour::Succeed(content))
    }

    pub fn failing(error: SummarizerError) -> Self {
        Self::with(Behaviour::Fail(error))
    }

    pub fn panicking(msg: &'static str) -> Self {
        Self::with(Behaviour::Panic(msg))
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ContentExtractor for MockExtractor {
    async fn extract_content(&self, url: &str) -> Result<ExtractedContent, SummarizerError> {
        self.calls.lock().unwrap().push(url.to_string());
        match &self.behaviour {
            Behaviour::Succeed(content) => Ok(content.clone()),
            Behaviour::Fail(error) => Err(error.clone()),
            Behaviour::Panic(msg) => panic!("{msg}"),
        }
    }
}
