use std::sync::Arc;

use crate::{
    domain::ChatCandidate,
    errors::Error,
    ports::BotApi,
    Result,
};

/// Telegram caps `getUpdates` at 100 entries.
pub const MAX_UPDATES_LIMIT: u8 = 100;

const NO_CHAT_MESSAGE: &str =
    "chat_id not provided and could not auto-detect. Please send a message to the bot first.";

/// Picks a destination chat from the bot's recent update feed.
///
/// Nothing is cached: every call re-queries Telegram.
pub struct ChatResolver {
    bot: Arc<dyn BotApi>,
    limit: u8,
}

impl ChatResolver {
    pub fn new(bot: Arc<dyn BotApi>, limit: u8) -> Self {
        Self {
            bot,
            limit: limit.clamp(1, MAX_UPDATES_LIMIT),
        }
    }

    pub async fn resolve(&self) -> Result<ChatCandidate> {
        let feed = match self.bot.get_updates(self.limit).await {
            Ok(feed) => feed,
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch updates for chat auto-detect");
                return Err(Error::NoChatFound(format!("{NO_CHAT_MESSAGE} ({e})")));
            }
        };

        let Some(picked) = most_recent(feed) else {
            return Err(Error::NoChatFound(NO_CHAT_MESSAGE.to_string()));
        };

        tracing::debug!(chat_id = %picked.chat_id, last_seen_at = %picked.last_seen_at, "auto-detected chat");
        Ok(picked)
    }
}

/// Newest candidate; on equal timestamps the one later in the feed wins.
fn most_recent(feed: Vec<ChatCandidate>) -> Option<ChatCandidate> {
    // `max_by_key` returns the last of several equal maxima.
    feed.into_iter().max_by_key(|c| c.last_seen_at)
}
