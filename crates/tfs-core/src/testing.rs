use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{ChatCandidate, ChatId, MessageId, SentMessage},
    errors::Error,
    ports::BotApi,
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    GetUpdates(u8),
    SendDocument {
        chat_id: ChatId,
        path: PathBuf,
        caption: Option<String>,
    },
    SendPhoto {
        chat_id: ChatId,
        path: PathBuf,
        caption: Option<String>,
    },
}

/// Recording fake: returns a canned feed and logs every call.
#[derive(Default)]
pub struct FakeBot {
    pub feed: Vec<ChatCandidate>,
    pub fail_updates: Option<String>,
    pub fail_send: Option<String>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeBot {
    pub fn with_feed(feed: Vec<ChatCandidate>) -> Self {
        Self {
            feed,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn sent(&self) -> Result<SentMessage> {
        match &self.fail_send {
            Some(e) => Err(Error::RemoteSend(e.clone())),
            None => Ok(SentMessage {
                message_id: MessageId(77),
            }),
        }
    }
}

#[async_trait]
impl BotApi for FakeBot {
    async fn get_updates(&self, limit: u8) -> Result<Vec<ChatCandidate>> {
        self.record(Call::GetUpdates(limit));
        match &self.fail_updates {
            Some(e) => Err(Error::External(e.clone())),
            None => Ok(self.feed.clone()),
        }
    }

    async fn send_document(
        &self,
        chat_id: &ChatId,
        file_path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        self.record(Call::SendDocument {
            chat_id: chat_id.clone(),
            path: file_path.to_path_buf(),
            caption: caption.map(|s| s.to_string()),
        });
        self.sent()
    }

    async fn send_photo(
        &self,
        chat_id: &ChatId,
        file_path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        self.record(Call::SendPhoto {
            chat_id: chat_id.clone(),
            path: file_path.to_path_buf(),
            caption: caption.map(|s| s.to_string()),
        });
        self.sent()
    }
}

pub fn candidate(chat: &str, ts: i64) -> ChatCandidate {
    ChatCandidate {
        chat_id: ChatId(chat.to_string()),
        last_seen_at: DateTime::<Utc>::from_timestamp(ts, 0).unwrap(),
    }
}

pub fn tmp(prefix: &str) -> PathBuf {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_nanos();
    let pid = std::process::id();
    PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}"))
}
