use digest_pulse::{AudioDownloader, VoiceError};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockDownloader {
    pub bytes: Vec<u8>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<VoiceError>,
}

impl Default for MockDownloader {
    fn default() -> Self {
        Self {
            bytes: vec![0x4f, 0x67, 0x67, 0x53],
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockDownloader {
    pub fn failing(error: VoiceError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }
}

impl AudioDownloader for MockDownloader {
    async fn download(&self, file_id: &str) -> Result<Vec<u8>, VoiceError> {
        self.calls.lock().unwrap().push(file_id.to_string());
        if let Some(ref error) = self.fail_with {
            return Err(error.clone());
        }
        Ok(self.bytes.clone())
    }
}
