//! Conversation domain - the vocabulary of the ordering dialogue.
//!
//! # Module Organization
//!
//! - `state` - the persisted per-user dialogue step
//! - `event` - normalized inbound events and button payloads
//! - `context` - working data carried between turns
//! - `effect` - outbound actions requested by a turn
//! - `screens` - texts and keyboards shown to the user

mod context;
mod effect;
mod event;
pub mod screens;
mod state;

pub use context::SessionContext;
pub use effect::{Button, Effect, Keyboard};
pub use event::{payloads, ButtonPress, InboundEvent, START_COMMAND};
pub use state::{ConversationState, UnknownStateError, ALL_STATES};
