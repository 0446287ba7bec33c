use std::{fmt, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;

/// Telegram chat id as given by the caller.
///
/// Kept as a string: Telegram accepts numeric ids (`-1001234567890`) as well as
/// public channel usernames (`@channel`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub String);

impl ChatId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i32);

/// Which upload call a request goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Document,
    Photo,
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Document => "Document",
            FileKind::Photo => "Photo",
        }
    }
}

/// One tool invocation.
#[derive(Clone, Debug)]
pub struct SendRequest {
    pub file_path: PathBuf,
    pub chat_id: Option<ChatId>,
    pub caption: Option<String>,
    pub kind: FileKind,
}

impl SendRequest {
    /// Build a request, treating blank chat ids and empty captions as absent.
    ///
    /// A non-blank chat id is kept exactly as given.
    pub fn new(
        kind: FileKind,
        file_path: impl Into<PathBuf>,
        chat_id: Option<String>,
        caption: Option<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            chat_id: chat_id.filter(|s| !s.trim().is_empty()).map(ChatId),
            caption: caption.filter(|c| !c.is_empty()),
            kind,
        }
    }
}

/// A chat the bot has recently received something from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatCandidate {
    pub chat_id: ChatId,
    pub last_seen_at: DateTime<Utc>,
}

/// What Telegram returned for a successful upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: MessageId,
}

/// Outcome of a send, returned to the tool caller as structured content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl SendResult {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            chat_id: None,
            error_kind: Some(kind),
            message: message.into(),
            message_id: None,
            file_name: None,
            size_bytes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_chat_id_and_empty_caption_are_absent() {
        let req = SendRequest::new(
            FileKind::Document,
            "/tmp/a.pdf",
            Some("   ".to_string()),
            Some(String::new()),
        );
        assert!(req.chat_id.is_none());
        assert!(req.caption.is_none());
    }

    #[test]
    fn chat_id_is_kept_verbatim() {
        let req = SendRequest::new(FileKind::Photo, "/tmp/a.png", Some(" 42 ".to_string()), None);
        assert_eq!(req.chat_id, Some(ChatId(" 42 ".to_string())));
    }

    #[test]
    fn failure_result_omits_chat_id() {
        let r = SendResult::failure(ErrorKind::NoChatFound, "nope");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v.get("success"), Some(&serde_json::json!(false)));
        assert_eq!(v.get("error_kind"), Some(&serde_json::json!("no_chat_found")));
        assert!(v.get("chat_id").is_none());
    }
}
