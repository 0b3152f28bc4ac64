//! Transport Port - Interface for the chat backend.
//!
//! The transport delivers outbound messages and produces the normalized
//! inbound events. Delayed messages are fire-once: there is no retry and no
//! cancellation.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::conversation::Keyboard;
use crate::domain::foundation::{MessageId, UserId};

/// Errors returned by the chat backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Chat API unavailable: {0}")]
    Unavailable(String),

    #[error("Chat API rejected request: {0}")]
    Rejected(String),
}

/// Port for sending messages to users.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(
        &self,
        to: UserId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError>;

    async fn send_photo(
        &self,
        to: UserId,
        url: &str,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError>;

    async fn delete_message(&self, chat: UserId, message_id: MessageId) -> Result<(), TransportError>;

    /// Acknowledge a button press without sending anything.
    async fn answer_button(&self, query_id: &str) -> Result<(), TransportError>;

    /// Deliver `text` to `to` once, after `delay`.
    ///
    /// Must return immediately; delivery failures are the transport's to log.
    fn schedule_message(&self, to: UserId, delay: Duration, text: String);
}
