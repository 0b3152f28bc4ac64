//! Recording transport for tests and dry runs.
//!
//! Everything "sent" is kept in memory in call order; scheduled messages are
//! recorded instead of being delivered later.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::conversation::Keyboard;
use crate::domain::foundation::{MessageId, UserId};
use crate::ports::{Transport, TransportError};

/// One call that reached the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Message {
        to: UserId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Photo {
        to: UserId,
        url: String,
        caption: String,
        keyboard: Option<Keyboard>,
    },
    Deleted {
        chat: UserId,
        message_id: MessageId,
    },
    Answered {
        query_id: String,
    },
}

impl Sent {
    /// Visible text of a message or photo caption.
    pub fn text(&self) -> Option<&str> {
        match self {
            Sent::Message { text, .. } => Some(text),
            Sent::Photo { caption, .. } => Some(caption),
            _ => None,
        }
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        match self {
            Sent::Message { keyboard, .. } | Sent::Photo { keyboard, .. } => keyboard.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    sent: Vec<Sent>,
    scheduled: Vec<(UserId, Duration, String)>,
    fail_sends: bool,
    fail_deletes: bool,
    unreachable: Vec<UserId>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Messages and photos addressed to `to`.
    pub fn sent_to(&self, to: UserId) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Message { to: t, .. } | Sent::Photo { to: t, .. } if *t == to))
            .collect()
    }

    pub fn scheduled(&self) -> Vec<(UserId, Duration, String)> {
        self.state.lock().unwrap().scheduled.clone()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.sent.clear();
        state.scheduled.clear();
    }

    /// Makes message and photo sends fail until switched off.
    pub fn fail_sends(&self, fail: bool) {
        self.state.lock().unwrap().fail_sends = fail;
    }

    /// Rejects every message and photo addressed to `user`, the way the Bot
    /// API answers for a chat that never started the bot.
    pub fn reject_sends_to(&self, user: UserId) {
        self.state.lock().unwrap().unreachable.push(user);
    }

    /// Makes deletions fail until switched off.
    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    fn record_send(&self, sent: Sent) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_sends {
            return Err(TransportError::Unavailable("recording transport offline".to_string()));
        }
        if let Sent::Message { to, .. } | Sent::Photo { to, .. } = &sent {
            if state.unreachable.contains(to) {
                return Err(TransportError::Rejected(format!(
                    "bot can't initiate conversation with {}",
                    to
                )));
            }
        }
        state.sent.push(sent);
        Ok(())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_message(
        &self,
        to: UserId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        self.record_send(Sent::Message {
            to,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        })
    }

    async fn send_photo(
        &self,
        to: UserId,
        url: &str,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        self.record_send(Sent::Photo {
            to,
            url: url.to_string(),
            caption: caption.to_string(),
            keyboard: keyboard.cloned(),
        })
    }

    async fn delete_message(&self, chat: UserId, message_id: MessageId) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(TransportError::Rejected("message can't be deleted".to_string()));
        }
        state.sent.push(Sent::Deleted { chat, message_id });
        Ok(())
    }

    async fn answer_button(&self, query_id: &str) -> Result<(), TransportError> {
        self.state.lock().unwrap().sent.push(Sent::Answered {
            query_id: query_id.to_string(),
        });
        Ok(())
    }

    fn schedule_message(&self, to: UserId, delay: Duration, text: String) {
        self.state.lock().unwrap().scheduled.push((to, delay, text));
    }
}
