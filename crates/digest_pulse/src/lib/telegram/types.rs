//! Subset of the Bot API object model the bot reads.

use serde::Deserialize;

/// Envelope wrapping every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
    pub voice: Option<MediaFile>,
    pub audio: Option<MediaFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Offsets and lengths are in UTF-16 code units
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
    pub url: Option<String>,
}

/// Voice note or audio attachment
#[derive(Debug, Clone, Deserialize)]
pub struct MediaFile {
    pub file_id: String,
    pub duration: Option<u64>,
    pub file_size: Option<u64>,
}

/// Result of `getFile`
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramFile {
    pub file_id: String,
    pub file_size: Option<u64>,
    pub file_path: Option<String>,
}
