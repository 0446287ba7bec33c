use std::{path::Path, sync::Arc};

use crate::{
    domain::{ChatId, FileKind, SendRequest, SendResult, SentMessage},
    errors::Error,
    ports::BotApi,
    resolver::ChatResolver,
    Result,
};

/// Telegram Bot API upload ceiling (50 MB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Validates a file, resolves the destination chat and uploads it.
///
/// Requests are independent; the only shared state is the bot handle.
pub struct FileDispatcher {
    bot: Arc<dyn BotApi>,
    resolver: ChatResolver,
}

impl FileDispatcher {
    pub fn new(bot: Arc<dyn BotApi>, updates_limit: u8) -> Self {
        Self {
            resolver: ChatResolver::new(bot.clone(), updates_limit),
            bot,
        }
    }

    /// Handle one request. Never fails: errors come back as `success = false`.
    pub async fn send(&self, req: SendRequest) -> SendResult {
        match self.try_send(&req).await {
            Ok(res) => res,
            Err(e) => {
                tracing::warn!(
                    kind = req.kind.label(),
                    path = %req.file_path.display(),
                    error = %e,
                    "send failed"
                );
                SendResult::failure(e.kind(), format!("Error: {e}"))
            }
        }
    }

    async fn try_send(&self, req: &SendRequest) -> Result<SendResult> {
        let size = validate_file(&req.file_path).await?;

        let chat_id = match &req.chat_id {
            Some(id) => id.clone(),
            None => self.resolver.resolve().await?.chat_id,
        };

        let sent = self
            .upload(req.kind, &chat_id, &req.file_path, req.caption.as_deref())
            .await
            .map_err(|e| match e {
                Error::RemoteSend(_) => e,
                other => Error::RemoteSend(other.to_string()),
            })?;

        let file_name = req
            .file_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        tracing::info!(
            kind = req.kind.label(),
            chat_id = %chat_id,
            size_bytes = size,
            message_id = sent.message_id.0,
            "file sent"
        );

        let message = format!(
            "{} sent successfully!\nFile: {file_name}\nSize: {size} bytes\nChat ID: {chat_id}\nMessage ID: {}",
            req.kind.label(),
            sent.message_id.0
        );

        Ok(SendResult {
            success: true,
            chat_id: Some(chat_id),
            error_kind: None,
            message,
            message_id: Some(sent.message_id),
            file_name: Some(file_name),
            size_bytes: Some(size),
        })
    }

    async fn upload(
        &self,
        kind: FileKind,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        match kind {
            FileKind::Document => self.bot.send_document(chat_id, path, caption).await,
            FileKind::Photo => self.bot.send_photo(chat_id, path, caption).await,
        }
    }
}

/// Check that `path` is a readable regular file within the upload ceiling.
///
/// Returns the file size in bytes. No network involved.
pub async fn validate_file(path: &Path) -> Result<u64> {
    let not_found = || Error::FileNotFound {
        path: path.to_path_buf(),
    };

    let md = tokio::fs::metadata(path).await.map_err(|_| not_found())?;
    if !md.is_file() {
        return Err(not_found());
    }
    // Existence alone is not enough; the upload needs to read it.
    tokio::fs::File::open(path).await.map_err(|_| not_found())?;

    let size = md.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(Error::FileTooLarge {
            path: path.to_path_buf(),
            size,
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        domain::MessageId,
        errors::ErrorKind,
        testing::{candidate, tmp, Call, FakeBot},
    };

    fn write_tmp(prefix: &str, len: u64) -> PathBuf {
        let p = tmp(prefix);
        let f = std::fs::File::create(&p).unwrap();
        f.set_len(len).unwrap();
        p
    }

    fn request(kind: FileKind, path: &Path, chat: Option<&str>, caption: Option<&str>) -> SendRequest {
        SendRequest::new(
            kind,
            path,
            chat.map(|s| s.to_string()),
            caption.map(|s| s.to_string()),
        )
    }

    #[tokio::test]
    async fn explicit_chat_skips_resolver_and_is_echoed() {
        let path = write_tmp("tfs-explicit", 10);
        let bot = Arc::new(FakeBot::with_feed(vec![candidate("999", 50)]));
        let d = FileDispatcher::new(bot.clone(), 100);

        let res = d
            .send(request(FileKind::Document, &path, Some("@my_channel"), None))
            .await;

        assert!(res.success, "{}", res.message);
        assert_eq!(res.chat_id, Some(ChatId("@my_channel".to_string())));
        assert_eq!(res.message_id, Some(MessageId(77)));
        assert_eq!(res.size_bytes, Some(10));
        assert!(!bot.calls().iter().any(|c| matches!(c, Call::GetUpdates(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn padded_chat_id_is_sent_and_echoed_unchanged() {
        let path = write_tmp("tfs-padded", 4);
        let bot = Arc::new(FakeBot::default());
        let d = FileDispatcher::new(bot.clone(), 100);

        let res = d
            .send(request(FileKind::Document, &path, Some(" 42 "), None))
            .await;

        assert!(res.success, "{}", res.message);
        assert_eq!(res.chat_id, Some(ChatId(" 42 ".to_string())));
        assert_eq!(
            bot.calls(),
            vec![Call::SendDocument {
                chat_id: ChatId(" 42 ".to_string()),
                path: path.clone(),
                caption: None,
            }]
        );
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn auto_resolved_chat_is_echoed() {
        let path = write_tmp("tfs-auto", 3);
        let bot = Arc::new(FakeBot::with_feed(vec![
            candidate("10", 10),
            candidate("20", 20),
            candidate("21", 20),
        ]));
        let d = FileDispatcher::new(bot.clone(), 100);

        let res = d.send(request(FileKind::Photo, &path, None, None)).await;

        assert!(res.success, "{}", res.message);
        assert_eq!(res.chat_id, Some(ChatId("21".to_string())));
        assert!(res.message.contains("Chat ID: 21"));
        assert_eq!(
            bot.calls(),
            vec![
                Call::GetUpdates(100),
                Call::SendPhoto {
                    chat_id: ChatId("21".to_string()),
                    path: path.clone(),
                    caption: None,
                },
            ]
        );
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn empty_feed_without_chat_is_no_chat_found() {
        let path = write_tmp("tfs-nochat", 3);
        let bot = Arc::new(FakeBot::default());
        let d = FileDispatcher::new(bot.clone(), 100);

        let res = d.send(request(FileKind::Document, &path, None, None)).await;

        assert!(!res.success);
        assert_eq!(res.error_kind, Some(ErrorKind::NoChatFound));
        assert!(res.chat_id.is_none());
        assert_eq!(bot.calls(), vec![Call::GetUpdates(100)]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn exactly_the_limit_is_accepted() {
        let path = write_tmp("tfs-limit", MAX_UPLOAD_BYTES);
        assert_eq!(validate_file(&path).await.unwrap(), MAX_UPLOAD_BYTES);

        let bot = Arc::new(FakeBot::default());
        let d = FileDispatcher::new(bot.clone(), 100);
        let res = d.send(request(FileKind::Document, &path, Some("1"), None)).await;
        assert!(res.success, "{}", res.message);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn one_byte_over_is_rejected_without_network() {
        let path = write_tmp("tfs-over", MAX_UPLOAD_BYTES + 1);
        let bot = Arc::new(FakeBot::with_feed(vec![candidate("1", 1)]));
        let d = FileDispatcher::new(bot.clone(), 100);

        let res = d.send(request(FileKind::Photo, &path, None, None)).await;

        assert!(!res.success);
        assert_eq!(res.error_kind, Some(ErrorKind::FileTooLarge));
        assert!(res.message.contains("50 MB"));
        assert!(bot.calls().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_file_short_circuits() {
        let path = tmp("tfs-missing");
        let bot = Arc::new(FakeBot::with_feed(vec![candidate("1", 1)]));
        let d = FileDispatcher::new(bot.clone(), 100);

        let res = d.send(request(FileKind::Document, &path, None, None)).await;

        assert!(!res.success);
        assert_eq!(res.error_kind, Some(ErrorKind::FileNotFound));
        assert!(res.message.contains(&path.display().to_string()));
        assert!(bot.calls().is_empty());
    }

    #[tokio::test]
    async fn directory_is_not_a_file() {
        let dir = tmp("tfs-dir");
        std::fs::create_dir_all(&dir).unwrap();
        let err = validate_file(&dir).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        let _ = std::fs::remove_dir(&dir);
    }

    #[tokio::test]
    async fn kind_selects_exactly_one_endpoint() {
        let path = write_tmp("tfs-kind", 5);

        let doc_bot = Arc::new(FakeBot::default());
        let res = FileDispatcher::new(doc_bot.clone(), 100)
            .send(request(FileKind::Document, &path, Some("5"), Some("hi")))
            .await;
        assert!(res.success);
        assert!(res.message.starts_with("Document sent"));

        let photo_bot = Arc::new(FakeBot::default());
        let res = FileDispatcher::new(photo_bot.clone(), 100)
            .send(request(FileKind::Photo, &path, Some("5"), Some("hi")))
            .await;
        assert!(res.success);
        assert!(res.message.starts_with("Photo sent"));

        assert_eq!(
            doc_bot.calls(),
            vec![Call::SendDocument {
                chat_id: ChatId("5".to_string()),
                path: path.clone(),
                caption: Some("hi".to_string()),
            }]
        );
        assert_eq!(
            photo_bot.calls(),
            vec![Call::SendPhoto {
                chat_id: ChatId("5".to_string()),
                path: path.clone(),
                caption: Some("hi".to_string()),
            }]
        );
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn remote_failure_is_reported_not_raised() {
        let path = write_tmp("tfs-remote", 5);
        let bot = FakeBot {
            fail_send: Some("Bad Request: chat not found".to_string()),
            ..FakeBot::default()
        };
        let d = FileDispatcher::new(Arc::new(bot), 100);

        let res = d.send(request(FileKind::Document, &path, Some("123"), None)).await;

        assert!(!res.success);
        assert_eq!(res.error_kind, Some(ErrorKind::RemoteSendFailure));
        assert!(res.message.contains("chat not found"));
        let _ = std::fs::remove_file(&path);
    }
}
