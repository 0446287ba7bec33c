//! Tool definitions and argument handling for the two send tools.

use serde::Deserialize;
use serde_json::{json, Value};

use tfs_core::domain::{FileKind, SendRequest, SendResult};

pub const SEND_DOCUMENT: &str = "send_telegram_document";
pub const SEND_PHOTO: &str = "send_telegram_photo";

pub fn kind_for(name: &str) -> Option<FileKind> {
    match name {
        SEND_DOCUMENT => Some(FileKind::Document),
        SEND_PHOTO => Some(FileKind::Photo),
        _ => None,
    }
}

fn input_schema(path_description: &str, caption_description: &str) -> Value {
    json!({
      "type": "object",
      "properties": {
        "file_path": { "type": "string", "description": path_description },
        "chat_id": {
          "type": "string",
          "description": "Telegram chat ID (optional, will auto-detect from the bot's most recent message if not provided)"
        },
        "caption": { "type": "string", "description": caption_description, "default": "" }
      },
      "required": ["file_path"]
    })
}

pub fn list() -> Value {
    json!({
      "tools": [
        {
          "name": SEND_DOCUMENT,
          "description": "Send a document file (PDF, ZIP, DOCX, etc.) to Telegram. Files up to 50 MB.",
          "inputSchema": input_schema("Absolute path to the file to send", "Optional caption for the file")
        },
        {
          "name": SEND_PHOTO,
          "description": "Send a photo/image file to Telegram. Files up to 50 MB.",
          "inputSchema": input_schema("Absolute path to the image file", "Optional caption for the photo")
        }
      ]
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SendArgs {
    file_path: Option<String>,
    chat_id: Option<Value>,
    caption: Option<String>,
}

/// Turn tool arguments into a request. `Err` carries a caller-facing message.
pub fn parse_request(kind: FileKind, args: &Value) -> Result<SendRequest, String> {
    let args: SendArgs = if args.is_null() {
        SendArgs::default()
    } else {
        serde_json::from_value(args.clone()).map_err(|e| format!("invalid arguments: {e}"))?
    };

    let file_path = args
        .file_path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| "file_path is required".to_string())?;

    // Hosts sometimes send numeric ids as JSON numbers.
    let chat_id = match args.chat_id {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => return Err(format!("chat_id must be a string or integer, got {other}")),
    };

    Ok(SendRequest::new(kind, file_path, chat_id, args.caption))
}

pub fn call_result(res: &SendResult) -> Value {
    json!({
      "content": [ { "type": "text", "text": res.message } ],
      "structuredContent": res,
      "isError": !res.success
    })
}

pub fn tool_error(message: &str) -> Value {
    json!({
      "content": [ { "type": "text", "text": format!("Error: {message}") } ],
      "isError": true
    })
}
