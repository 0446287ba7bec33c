use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dispatcher::MAX_UPLOAD_BYTES;

/// Core error type.
///
/// The adapter crate maps teloxide errors into this type; the dispatcher turns
/// every variant into a structured `SendResult` via [`Error::kind`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error(
        "file too large: {} is {size} bytes, Telegram accepts at most {} bytes (50 MB)",
        .path.display(),
        MAX_UPLOAD_BYTES
    )]
    FileTooLarge { path: PathBuf, size: u64 },

    #[error("{0}")]
    NoChatFound(String),

    #[error("telegram send failed: {0}")]
    RemoteSend(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure category reported back to the tool caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileNotFound,
    FileTooLarge,
    NoChatFound,
    RemoteSendFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound { .. } => ErrorKind::FileNotFound,
            Error::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Error::NoChatFound(_) => ErrorKind::NoChatFound,
            Error::RemoteSend(_) | Error::External(_) | Error::Config(_) => {
                ErrorKind::RemoteSendFailure
            }
        }
    }
}
