use std::{sync::Arc, sync::LazyLock, time::Duration};

use regex::Regex;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::{
    formatter::{
        format_error, format_summary, format_transcript, format_voice_error, split_message,
        TELEGRAM_MAX_MESSAGE_LENGTH,
    },
    telegram::{types::Message, TelegramClient},
    SummaryOrchestrator, VoiceError, VoiceOrchestrator, VoiceProcessingResult,
};

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

const START_TEXT: &str = "Hi! Send me a link to an article and I will write a short digest of it. \
Voice messages work too: short ones are transcribed, long ones are summarized. \
Digests are always written in the same language, whatever the source.";
const HELP_TEXT: &str = "📖 **How to use:**\nSend a link (for example https://habr.com/...) and \
I will reply with the main idea and key points.\nSend a voice message or an audio file to get a \
transcript or a summary of it.";
const NO_LINK_TEXT: &str = "⚠️ No link found.";
const LISTENING_TEXT: &str = "🎧 Listening...";
const ANALYSING_TEXT: &str = "📄 Speech recognised. Analysing...";

/// One outgoing message, sent as plain text or as chunked Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Plain(&'static str),
    Markdown(String),
}

/// Messages answering a processed voice message, in sending order
pub fn voice_replies(result: &Result<VoiceProcessingResult, VoiceError>) -> Vec<Reply> {
    match result {
        Ok(VoiceProcessingResult::ShortMessage(text)) => {
            vec![Reply::Markdown(format_transcript(text))]
        }
        Ok(VoiceProcessingResult::LongMessageWithSummary { summary, .. }) => vec![
            Reply::Plain(ANALYSING_TEXT),
            Reply::Markdown(format_summary(summary)),
        ],
        Err(e) => vec![Reply::Markdown(format_voice_error(e))],
    }
}

/// What an incoming message asks the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Start,
    Help,
    Link(String),
    NoLink,
    Voice(String),
}

/// Maps a message to the action it triggers; unknown commands map to `None`
pub fn classify_message(message: &Message) -> Option<Incoming> {
    if let Some(media) = message.voice.as_ref().or(message.audio.as_ref()) {
        return Some(Incoming::Voice(media.file_id.clone()));
    }

    let text = message.text.as_deref()?;
    if let Some(command) = text.strip_prefix('/') {
        let name = command
            .split_whitespace()
            .next()
            .and_then(|c| c.split('@').next())
            .unwrap_or_default();
        return match name {
            "start" => Some(Incoming::Start),
            "help" => Some(Incoming::Help),
            _ => None,
        };
    }

    Some(extract_url(message).map_or(Incoming::NoLink, Incoming::Link))
}

/// Finds the link in a text message: a `url` entity first, then a `text_link`
/// entity, then anything that looks like an http(s) url.
pub fn extract_url(message: &Message) -> Option<String> {
    let text = message.text.as_deref()?;

    let from_url_entity = message
        .entities
        .iter()
        .find(|e| e.kind == "url")
        .and_then(|e| utf16_slice(text, e.offset, e.length));
    let from_text_link = || {
        message
            .entities
            .iter()
            .find(|e| e.kind == "text_link")
            .and_then(|e| e.url.clone())
    };
    let from_regex = || URL_RE.find(text).map(|m| m.as_str().to_string());

    from_url_entity
        .or_else(from_text_link)
        .or_else(from_regex)
        .map(|url| {
            if url.starts_with("http://") || url.starts_with("https://") {
                url
            } else {
                format!("https://{url}")
            }
        })
}

fn utf16_slice(text: &str, offset: usize, length: usize) -> Option<String> {
    let units = text.encode_utf16().collect::<Vec<_>>();
    let end = offset.checked_add(length)?;
    units
        .get(offset..end)
        .and_then(|slice| String::from_utf16(slice).ok())
}

/// Long-polls the Bot API and answers every message on its own task
pub struct BotController<O, V>
where
    O: SummaryOrchestrator + Send + Sync + 'static,
    V: VoiceOrchestrator + Send + Sync + 'static,
{
    client: TelegramClient,
    summaries: O,
    voice: V,
    poll_timeout: u64,
}

impl<O, V> BotController<O, V>
where
    O: SummaryOrchestrator + Send + Sync + 'static,
    V: VoiceOrchestrator + Send + Sync + 'static,
{
    pub fn new(client: TelegramClient, summaries: O, voice: V, poll_timeout: u64) -> Self {
        Self {
            client,
            summaries,
            voice,
            poll_timeout,
        }
    }

    /// Polls until `shutdown` fires, then waits for in-flight messages
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let tracker = TaskTracker::new();
        let mut offset = 0;

        tracing::info!("Bot is polling for updates");

        loop {
            let polled = tokio::select! {
                _ = shutdown.cancelled() => break,
                polled = self.client.get_updates(offset, self.poll_timeout) => polled,
            };

            let updates = match polled {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to poll updates");
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(POLL_ERROR_BACKOFF) => continue,
                    }
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);

                let Some(message) = update.message else {
                    continue;
                };
                let Some(incoming) = classify_message(&message) else {
                    continue;
                };

                let bot = Arc::clone(&self);
                tracker.spawn(async move { bot.handle(message.chat.id, incoming).await });
            }
        }

        tracker.close();
        tracing::info!(in_flight = tracker.len(), "Shutting down, waiting for in-flight messages");
        tracker.wait().await;
    }

    #[tracing::instrument(skip(self))]
    async fn handle(&self, chat_id: i64, incoming: Incoming) {
        match incoming {
            Incoming::Start => self.reply_plain(chat_id, START_TEXT).await,
            Incoming::Help => self.reply(chat_id, HELP_TEXT).await,
            Incoming::NoLink => self.reply_plain(chat_id, NO_LINK_TEXT).await,
            Incoming::Link(url) => self.handle_link(chat_id, &url).await,
            Incoming::Voice(file_id) => self.handle_voice(chat_id, &file_id).await,
        }
    }

    async fn handle_link(&self, chat_id: i64, url: &str) {
        self.typing(chat_id).await;

        let text = match self.summaries.process_summary_request(url).await {
            Ok(summary) => format_summary(&summary),
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, url, "Summary request failed");
                format_error(&e)
            }
        };

        self.reply(chat_id, &text).await;
    }

    async fn handle_voice(&self, chat_id: i64, file_id: &str) {
        self.typing(chat_id).await;
        self.reply_plain(chat_id, LISTENING_TEXT).await;

        let result = self.voice.process_voice(file_id).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Voice message processing failed");
        }

        for reply in voice_replies(&result) {
            match reply {
                Reply::Plain(text) => self.reply_plain(chat_id, text).await,
                Reply::Markdown(text) => self.reply(chat_id, &text).await,
            }
        }
    }

    async fn typing(&self, chat_id: i64) {
        if let Err(e) = self.client.send_chat_action(chat_id, "typing").await {
            tracing::debug!(error = %e, "Failed to send chat action");
        }
    }

    async fn reply_plain(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.client.send_plain_message(chat_id, text).await {
            tracing::error!(error = %e, "Failed to send message");
        }
    }

    /// Sends Markdown text in as many messages as the size limit requires
    async fn reply(&self, chat_id: i64, text: &str) {
        for chunk in split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH) {
            if let Err(e) = self.client.send_message(chat_id, &chunk).await {
                tracing::error!(error = %e, "Failed to send message chunk");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        telegram::types::{Chat, MediaFile, MessageEntity},
        Summary, VOICE_MESSAGE_URL,
    };

    fn text_message(text: &str, entities: Vec<MessageEntity>) -> Message {
        Message {
            message_id: 1,
            chat: Chat { id: 7 },
            text: Some(text.into()),
            entities,
            voice: None,
            audio: None,
        }
    }

    fn entity(kind: &str, offset: usize, length: usize, url: Option<&str>) -> MessageEntity {
        MessageEntity {
            kind: kind.into(),
            offset,
            length,
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_url_entity_uses_utf16_offsets() {
        // the emoji takes two UTF-16 units, so the url starts at unit 7
        let message = text_message(
            "😀 see https://example.com/a please",
            vec![entity("url", 7, 21, None)],
        );
        assert_eq!(
            extract_url(&message).as_deref(),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn test_text_link_entity() {
        let message = text_message(
            "read this",
            vec![entity("text_link", 0, 4, Some("https://example.com/hidden"))],
        );
        assert_eq!(
            extract_url(&message).as_deref(),
            Some("https://example.com/hidden")
        );
    }

    #[test]
    fn test_regex_fallback_and_scheme_completion() {
        let message = text_message("look: http://example.com/x ok", vec![]);
        assert_eq!(extract_url(&message).as_deref(), Some("http://example.com/x"));

        let bare = text_message("example.com/y", vec![entity("url", 0, 13, None)]);
        assert_eq!(extract_url(&bare).as_deref(), Some("https://example.com/y"));
    }

    #[test]
    fn test_classify_commands_and_media() {
        assert_eq!(
            classify_message(&text_message("/start", vec![])),
            Some(Incoming::Start)
        );
        assert_eq!(
            classify_message(&text_message("/help@digest_bot", vec![])),
            Some(Incoming::Help)
        );
        assert_eq!(classify_message(&text_message("/unknown", vec![])), None);
        assert_eq!(
            classify_message(&text_message("no links here", vec![])),
            Some(Incoming::NoLink)
        );

        let mut voice = text_message("", vec![]);
        voice.text = None;
        voice.audio = Some(MediaFile {
            file_id: "audio-1".into(),
            duration: Some(10),
            file_size: Some(1024),
        });
        assert_eq!(
            classify_message(&voice),
            Some(Incoming::Voice("audio-1".into()))
        );
    }

    fn voice_summary() -> Summary {
        Summary {
            main_idea: "Asks to move the meeting".into(),
            key_points: vec!["Meeting moves to Friday".into()],
            sentiment: "Request".into(),
            clickbait_score: 0,
            tags: vec![],
            title: None,
            original_url: VOICE_MESSAGE_URL.into(),
            was_truncated: false,
        }
    }

    #[test]
    fn test_long_voice_result_announces_analysis_before_summary() {
        let summary = voice_summary();
        let replies = voice_replies(&Ok(VoiceProcessingResult::LongMessageWithSummary {
            raw_text: "a long transcript".into(),
            summary: summary.clone(),
        }));

        assert_eq!(
            replies,
            vec![
                Reply::Plain(ANALYSING_TEXT),
                Reply::Markdown(format_summary(&summary)),
            ]
        );
    }

    #[test]
    fn test_short_voice_result_and_failure_are_single_replies() {
        assert_eq!(
            voice_replies(&Ok(VoiceProcessingResult::ShortMessage("hello".into()))),
            vec![Reply::Markdown(format_transcript("hello"))]
        );

        let error = VoiceError::Download("File path is empty".into());
        assert_eq!(
            voice_replies(&Err(error.clone())),
            vec![Reply::Markdown(format_voice_error(&error))]
        );
    }
}
