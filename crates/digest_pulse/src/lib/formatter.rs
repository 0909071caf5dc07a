//! Telegram-flavoured Markdown rendering of pipeline results.

use itertools::Itertools;

use crate::{SummarizerError, Summary, VoiceError};

/// Telegram caps a message at 4096 UTF-16 code units
pub const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;
pub const CONTINUATION_PREFIX: &str = "_(continued)_\n";

pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();

    if summary.was_truncated {
        out.push_str("⚠️ _Very long content, only partially processed_\n\n");
    }

    if summary.is_voice() {
        out.push_str("🎙 **Voice message**\n\n");
    } else {
        let title = summary.title.as_deref().unwrap_or("Untitled");
        out.push_str(&format!("📄 **{title}**\n\n"));
    }

    out.push_str(&format!("**Main idea:** {}\n\n", summary.main_idea));

    if !summary.key_points.is_empty() {
        out.push_str("**Key points:**\n");
        for point in &summary.key_points {
            out.push_str(&format!("• {point}\n"));
        }
        out.push('\n');
    }

    let tags = summary
        .tags
        .iter()
        .map(|t| t.trim().trim_start_matches('#').split_whitespace().join("_"))
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{t}"))
        .join(" ");
    if !tags.is_empty() {
        out.push_str(&tags);
        out.push_str("\n\n");
    }

    if !summary.is_voice() {
        out.push_str(&format!("🔗 [Original]({})\n\n", summary.original_url));
    }

    out.push_str(&format!(
        "{} **Tone:** {}",
        sentiment_glyph(&summary.sentiment),
        summary.sentiment
    ));

    if summary.clickbait_score > 5 {
        out.push_str(&format!(
            "  |  ⚠️ **Clickbait:** {}/10",
            summary.clickbait_score
        ));
    }

    out
}

fn sentiment_glyph(sentiment: &str) -> &'static str {
    match sentiment.to_lowercase().as_str() {
        "positive" => "🟢",
        "negative" => "🔴",
        "neutral" => "⚪",
        "technical" => "🔧",
        _ => "🔵",
    }
}

pub fn format_error(error: &SummarizerError) -> String {
    match error {
        SummarizerError::NetworkError(msg) => format!("🌐 **Access error:** {msg}"),
        SummarizerError::ParsingError(msg) => format!("📑 **Processing error:** {msg}"),
        SummarizerError::AIError(msg) => format!("🤖 **AI error:** {msg}"),
        SummarizerError::ValidationError(msg) => format!("⚠️ **Validation error:** {msg}"),
        SummarizerError::UnknownError(_) => {
            "❌ **Error:** Something went wrong. Please try again later.".to_string()
        }
    }
}

pub fn format_voice_error(error: &VoiceError) -> String {
    match error {
        VoiceError::FileSizeLimitExceeded(msg) => format!("❌ The file is too large. {msg}"),
        VoiceError::Download(_) => "❌ Could not download the file from Telegram.".to_string(),
        VoiceError::Transcription(_) => "❌ The speech could not be recognized.".to_string(),
        VoiceError::Summarization(inner) => format_error(inner),
    }
}

/// Short transcripts are echoed back as-is
pub fn format_transcript(text: &str) -> String {
    format!("🗣 *Transcript:* {text}")
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Byte index of the longest prefix of `text` that fits in `budget` UTF-16 units
fn window_end(text: &str, budget: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > budget {
            return idx;
        }
    }
    text.len()
}

/// Splits `text` into ordered chunks of at most `limit` UTF-16 units each.
///
/// Every chunk but the first is prefixed with [`CONTINUATION_PREFIX`], which
/// counts against the limit. Cuts land after the last newline of a window when
/// there is one. Dropping the prefixes and concatenating the chunks gives back
/// `text`.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if utf16_len(text) <= limit {
        return vec![text.to_string()];
    }

    let continued_budget = limit.saturating_sub(utf16_len(CONTINUATION_PREFIX)).max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let first = chunks.is_empty();
        let budget = if first { limit.max(1) } else { continued_budget };

        let end = window_end(rest, budget);
        let split = if end == rest.len() {
            end
        } else {
            match rest[..end].rfind('\n') {
                Some(newline) => newline + 1,
                // a single char wider than the budget still has to go somewhere
                None if end == 0 => rest.chars().next().map_or(rest.len(), char::len_utf8),
                None => end,
            }
        };

        let (chunk, tail) = rest.split_at(split);
        chunks.push(if first {
            chunk.to_string()
        } else {
            format!("{CONTINUATION_PREFIX}{chunk}")
        });
        rest = tail;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VOICE_MESSAGE_URL;

    fn summary() -> Summary {
        Summary {
            main_idea: "Main Idea".into(),
            key_points: vec!["Point 1".into(), "Point 2".into()],
            sentiment: "Positive".into(),
            clickbait_score: 2,
            tags: vec!["AI".into(), "#Tech".into(), "machine learning".into()],
            title: Some("Article Title".into()),
            original_url: "http://example.com".into(),
            was_truncated: false,
        }
    }

    #[test]
    fn test_summary_contains_every_section_in_order() {
        let text = format_summary(&summary());

        let sections = [
            "📄 **Article Title**",
            "**Main idea:** Main Idea",
            "• Point 1",
            "• Point 2",
            "#AI #Tech #machine_learning",
            "🔗 [Original](http://example.com)",
            "🟢 **Tone:** Positive",
        ];
        let positions = sections
            .iter()
            .map(|s| text.find(s).unwrap_or_else(|| panic!("missing {s:?} in {text}")))
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");

        assert!(!text.contains("Clickbait"));
        assert!(!text.contains("partially processed"));
    }

    #[test]
    fn test_clickbait_warning_and_truncation_notice() {
        let text = format_summary(&Summary {
            clickbait_score: 8,
            was_truncated: true,
            sentiment: "Neutral".into(),
            ..summary()
        });

        assert!(text.starts_with("⚠️ _Very long content, only partially processed_"));
        assert!(text.ends_with("⚪ **Tone:** Neutral  |  ⚠️ **Clickbait:** 8/10"));
    }

    #[test]
    fn test_voice_summary_has_no_source_link() {
        let text = format_summary(&Summary {
            title: None,
            original_url: VOICE_MESSAGE_URL.into(),
            sentiment: "Question".into(),
            ..summary()
        });

        assert!(text.starts_with("🎙 **Voice message**"));
        assert!(!text.contains("[Original]"));
        assert!(text.contains("🔵 **Tone:** Question"));
    }

    #[test]
    fn test_error_rendering_hides_unknown_causes() {
        assert_eq!(
            format_error(&SummarizerError::NetworkError("Access denied (403)".into())),
            "🌐 **Access error:** Access denied (403)"
        );
        let unknown = format_error(&SummarizerError::UnknownError("index out of bounds".into()));
        assert!(!unknown.contains("index out of bounds"));
    }

    #[test]
    fn test_voice_summarization_error_uses_summary_rendering() {
        let inner = SummarizerError::AIError("Empty response from OpenAI".into());
        assert_eq!(
            format_voice_error(&VoiceError::Summarization(inner.clone())),
            format_error(&inner)
        );
    }

    #[test]
    fn test_short_text_is_not_split() {
        assert_eq!(split_message("hello", 4096), vec!["hello".to_string()]);
    }

    #[test]
    fn test_long_summary_splits_within_limit() {
        let long = Summary {
            key_points: (0..400).map(|i| format!("Key point number {i} with some detail")).collect(),
            ..summary()
        };
        let text = format_summary(&long);
        assert!(utf16_len(&text) > TELEGRAM_MAX_MESSAGE_LENGTH);

        let chunks = split_message(&text, TELEGRAM_MAX_MESSAGE_LENGTH);

        assert!(chunks.len() > 1);
        assert!(!chunks[0].starts_with(CONTINUATION_PREFIX));
        for chunk in &chunks {
            assert!(utf16_len(chunk) <= TELEGRAM_MAX_MESSAGE_LENGTH);
        }
        for chunk in &chunks[1..] {
            assert!(chunk.starts_with(CONTINUATION_PREFIX));
        }

        let rebuilt = chunks
            .iter()
            .map(|c| c.strip_prefix(CONTINUATION_PREFIX).unwrap_or(c))
            .collect::<String>();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_split_prefers_newlines() {
        let text = "aaaa\nbbbb\ncccc\ndddddddddd";
        let chunks = split_message(text, 20);

        assert_eq!(
            chunks,
            vec![
                "aaaa\nbbbb\ncccc\n".to_string(),
                format!("{CONTINUATION_PREFIX}dddddd"),
                format!("{CONTINUATION_PREFIX}dddd"),
            ]
        );
    }

    #[test]
    fn test_split_counts_utf16_units() {
        // each emoji is two UTF-16 units
        let text = "😀".repeat(30);
        let chunks = split_message(&text, 40);

        assert_eq!(chunks[0], "😀".repeat(20));
        for chunk in &chunks {
            assert!(utf16_len(chunk) <= 40);
        }
        let rebuilt = chunks
            .iter()
            .map(|c| c.strip_prefix(CONTINUATION_PREFIX).unwrap_or(c))
            .collect::<String>();
        assert_eq!(rebuilt, text);
    }
}
