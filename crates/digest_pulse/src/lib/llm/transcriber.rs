use std::{fmt::Display, future::Future};

use serde::Deserialize;

pub trait Transcriber {
    const TRANSCRIBER_MODEL: &'static str;

    type Error: Display;

    fn transcribe(
        &self,
        audio_input: AudioInput,
    ) -> impl Future<Output = Result<TranscribeResponse, Self::Error>> + Send;
}

/// Raw audio handed to the speech-to-text provider
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl AudioInput {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
    pub duration: Option<f64>,
}
