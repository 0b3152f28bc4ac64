//! Outbound effects produced by a turn.
//!
//! Handlers never talk to the transport directly. They return the effects
//! they want, which keeps every turn observable in tests without a chat
//! backend or a clock.

use std::time::Duration;

use crate::domain::foundation::{MessageId, UserId};

/// An inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Reply markup attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Rows of inline buttons.
    Inline(Vec<Vec<Button>>),
    /// One-time reply keyboard with a single share-location button.
    RequestLocation { label: String },
}

impl Keyboard {
    /// One button per row.
    pub fn column(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self::Inline(buttons.into_iter().map(|b| vec![b]).collect())
    }

    /// Payloads of all inline buttons, row by row.
    pub fn payloads(&self) -> Vec<&str> {
        match self {
            Self::Inline(rows) => rows
                .iter()
                .flat_map(|row| row.iter().map(|b| b.payload.as_str()))
                .collect(),
            Self::RequestLocation { .. } => Vec::new(),
        }
    }
}

/// A side effect to run after the handler returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SendMessage {
        to: UserId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    SendPhoto {
        to: UserId,
        url: String,
        caption: String,
        keyboard: Option<Keyboard>,
    },
    DeleteMessage {
        chat: UserId,
        message_id: MessageId,
    },
    /// Stops the spinner on a pressed button.
    AnswerButton { query_id: String },
    /// Fire-once message delivered after `delay`.
    ScheduleMessage {
        to: UserId,
        delay: Duration,
        text: String,
    },
}

impl Effect {
    pub fn send(to: UserId, text: impl Into<String>) -> Self {
        Effect::SendMessage {
            to,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn send_with_keyboard(to: UserId, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::SendMessage {
            to,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    /// Whether the user sees something new in a chat.
    pub fn is_visible(&self) -> bool {
        matches!(
            self,
            Effect::SendMessage { .. } | Effect::SendPhoto { .. } | Effect::DeleteMessage { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_puts_each_button_on_its_own_row() {
        let kb = Keyboard::column([Button::new("A", "a"), Button::new("B", "b")]);
        match &kb {
            Keyboard::Inline(rows) => assert_eq!(rows.len(), 2),
            other => panic!("unexpected keyboard {:?}", other),
        }
        assert_eq!(kb.payloads(), vec!["a", "b"]);
    }

    #[test]
    fn location_keyboard_has_no_payloads() {
        let kb = Keyboard::RequestLocation {
            label: "Send".to_string(),
        };
        assert!(kb.payloads().is_empty());
    }

    #[test]
    fn acknowledgements_are_not_visible() {
        assert!(!Effect::AnswerButton {
            query_id: "q".to_string()
        }
        .is_visible());
        assert!(Effect::send(UserId::new(1), "hi").is_visible());
    }
}
