//! Telegram file sender MCP server.
//!
//! - JSON-RPC over stdio (newline-delimited)
//! - Exposes `send_telegram_document` and `send_telegram_photo`
//! - Auto-detects the destination chat from the bot's recent updates when the
//!   caller does not pass `chat_id`

use std::sync::Arc;

use tfs_core::{config::Config, dispatcher::FileDispatcher, ports::BotApi};
use tfs_telegram::TelegramBotApi;

mod rpc;
mod server;
mod tools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tfs_core::logging::init("telegram-file-sender")?;

    let cfg = Config::load()?;
    let bot: Arc<dyn BotApi> = Arc::new(TelegramBotApi::from_config(&cfg)?);
    let dispatcher = Arc::new(FileDispatcher::new(bot, cfg.updates_limit));
    let server = Arc::new(server::Server::new(dispatcher));

    tracing::info!(
        updates_limit = cfg.updates_limit,
        timeout_secs = cfg.request_timeout.as_secs(),
        "telegram-file-sender MCP server running on stdio"
    );

    server::serve(server, tokio::io::stdin(), tokio::io::stdout()).await
}
