//! Telegram adapters: Bot API client, transport, update normalization and
//! the long-polling dispatch loop.

mod api;
mod client;
mod dispatcher;
mod updates;

pub use api::{CallbackQuery, Chat, Location, Message, Update, User};
pub use client::{TelegramClient, TelegramConfig, TelegramTransport};
pub use dispatcher::PollingDispatcher;
pub use updates::normalize_update;
