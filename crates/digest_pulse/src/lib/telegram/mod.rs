//! Telegram Bot API transport: polling, replies and voice file downloads.

pub mod bot;
pub mod client;
pub mod types;

pub use bot::{classify_message, extract_url, voice_replies, BotController, Incoming, Reply};
pub use client::{TelegramClient, TelegramError};
