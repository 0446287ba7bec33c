//! Telegram adapter (teloxide).
//!
//! Implements the `tfs-core` [`BotApi`] port over the Telegram Bot API.

use std::path::Path;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InputFile, Recipient, UpdateKind},
};

use tokio::time::sleep;

use tfs_core::{
    config::Config,
    domain::{ChatCandidate, ChatId, MessageId, SentMessage},
    errors::Error,
    ports::BotApi,
    Result,
};

#[derive(Clone)]
pub struct TelegramBotApi {
    bot: Bot,
}

impl TelegramBotApi {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Build a bot from config: custom HTTP timeout and optional API URL.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        let mut bot = Bot::with_client(cfg.telegram_bot_token.clone(), client);
        if let Some(url) = &cfg.telegram_api_url {
            let url = reqwest::Url::parse(url)
                .map_err(|e| Error::Config(format!("invalid TELEGRAM_API_URL {url}: {e}")))?;
            bot = bot.set_api_url(url);
        }

        Ok(Self::new(bot))
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> std::result::Result<T, teloxide::RequestError>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        // Honour a single flood-control wait; anything else goes back to the caller.
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(teloxide::RequestError::RetryAfter(d)) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    tracing::debug!(wait = ?d, "telegram flood control, retrying once");
                    sleep(d).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Numeric ids go through as ids, anything else is a public `@username`.
pub fn recipient(chat_id: &ChatId) -> Recipient {
    let raw = chat_id.as_str().trim();
    match raw.parse::<i64>() {
        Ok(id) => Recipient::Id(teloxide::types::ChatId(id)),
        Err(_) if raw.starts_with('@') => Recipient::ChannelUsername(raw.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{raw}")),
    }
}

/// Reduce raw updates to chat candidates, keeping Telegram's order.
///
/// Only message-carrying updates name a chat we can post to.
pub fn candidates(updates: &[Update]) -> Vec<ChatCandidate> {
    updates
        .iter()
        .filter_map(|u| match &u.kind {
            UpdateKind::Message(m)
            | UpdateKind::EditedMessage(m)
            | UpdateKind::ChannelPost(m)
            | UpdateKind::EditedChannelPost(m) => Some(ChatCandidate {
                chat_id: ChatId::from(m.chat.id.0),
                last_seen_at: m.date,
            }),
            _ => None,
        })
        .collect()
}

fn sent(msg: &Message) -> SentMessage {
    SentMessage {
        message_id: MessageId(msg.id.0),
    }
}

fn send_err(e: teloxide::RequestError) -> Error {
    Error::RemoteSend(e.to_string())
}

#[async_trait]
impl BotApi for TelegramBotApi {
    async fn get_updates(&self, limit: u8) -> Result<Vec<ChatCandidate>> {
        let updates = self
            .with_retry(|| self.bot.get_updates().limit(limit))
            .await
            .map_err(|e| Error::External(format!("telegram getUpdates failed: {e}")))?;

        let out = candidates(&updates);
        tracing::debug!(updates = updates.len(), candidates = out.len(), "fetched updates");
        Ok(out)
    }

    async fn send_document(
        &self,
        chat_id: &ChatId,
        file_path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        let to = recipient(chat_id);
        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_document(to.clone(), InputFile::file(file_path.to_path_buf()));
                if let Some(c) = caption {
                    req = req.caption(c.to_string());
                }
                req
            })
            .await
            .map_err(send_err)?;
        Ok(sent(&msg))
    }

    async fn send_photo(
        &self,
        chat_id: &ChatId,
        file_path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        let to = recipient(chat_id);
        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_photo(to.clone(), InputFile::file(file_path.to_path_buf()));
                if let Some(c) = caption {
                    req = req.caption(c.to_string());
                }
                req
            })
            .await
            .map_err(send_err)?;
        Ok(sent(&msg))
    }
}
