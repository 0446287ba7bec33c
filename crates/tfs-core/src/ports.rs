use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::{ChatCandidate, ChatId, SentMessage},
    Result,
};

/// Hexagonal port for the Telegram Bot API.
///
/// Implementations must be safe to share between concurrent tool calls.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Recent inbound updates reduced to `(chat, timestamp)` pairs, in the order
    /// Telegram returned them (oldest first).
    async fn get_updates(&self, limit: u8) -> Result<Vec<ChatCandidate>>;

    async fn send_document(
        &self,
        chat_id: &ChatId,
        file_path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage>;

    async fn send_photo(
        &self,
        chat_id: &ChatId,
        file_path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage>;
}
