//! Normalized inbound events.
//!
//! The transport turns its raw updates into exactly one `InboundEvent` per
//! turn; the state machine never sees transport payloads.

use crate::domain::delivery::Coordinates;
use crate::domain::foundation::MessageId;

/// Command that restarts the dialogue from any state.
pub const START_COMMAND: &str = "start";

/// Button payloads understood by the handlers.
///
/// Any other payload is data: a product id in the menu, a cart line id in
/// the cart.
pub mod payloads {
    /// Opens the cart from any state.
    pub const CART: &str = "cart";
    /// Returns to the product list; behaves exactly like the start command.
    pub const MENU: &str = "/start";
    pub const BACK: &str = "back";
    pub const ADD_TO_CART: &str = "add_to_cart";
    pub const PAYMENT: &str = "payment";
    pub const SHIPPING: &str = "shipping";
    pub const PICKUP: &str = "pickup";
}

/// An inline button press.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonPress {
    pub payload: String,
    /// Message carrying the pressed button, deleted when the screen is replaced.
    pub message_id: Option<MessageId>,
    /// Transport handle used to acknowledge the press.
    pub query_id: Option<String>,
}

/// One user action, normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Command { name: String },
    ButtonPress(ButtonPress),
    TextMessage { text: String },
    LocationShare(Coordinates),
}

impl InboundEvent {
    pub fn command(name: impl Into<String>) -> Self {
        Self::Command { name: name.into() }
    }

    /// A button press without transport handles.
    pub fn button(payload: impl Into<String>) -> Self {
        Self::ButtonPress(ButtonPress {
            payload: payload.into(),
            message_id: None,
            query_id: None,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::TextMessage { text: text.into() }
    }

    pub fn location(coordinates: Coordinates) -> Self {
        Self::LocationShare(coordinates)
    }

    /// True for `/start` and for the "back to menu" button.
    pub fn is_start(&self) -> bool {
        match self {
            Self::Command { name } => name == START_COMMAND,
            Self::ButtonPress(press) => press.payload == payloads::MENU,
            _ => false,
        }
    }

    /// True for the global cart shortcut.
    pub fn is_cart_shortcut(&self) -> bool {
        self.button_payload() == Some(payloads::CART)
    }

    pub fn button_payload(&self) -> Option<&str> {
        match self {
            Self::ButtonPress(press) => Some(press.payload.as_str()),
            _ => None,
        }
    }

    /// Message holding the pressed button, if any.
    pub fn pressed_message(&self) -> Option<MessageId> {
        match self {
            Self::ButtonPress(press) => press.message_id,
            _ => None,
        }
    }

    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command { .. } => "command",
            Self::ButtonPress(_) => "button",
            Self::TextMessage { .. } => "text",
            Self::LocationShare(_) => "location",
        }
    }
}
