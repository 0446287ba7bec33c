//! Core logic for the Telegram file sender MCP server.
//!
//! This crate knows nothing about teloxide or JSON-RPC. Telegram lives behind the
//! [`ports::BotApi`] port implemented in the adapter crate, so the resolver and
//! dispatcher can be exercised with a fake client.

pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod ports;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use errors::{Error, Result};
