//! Application layer - the conversation engine and its state handlers.
//!
//! The engine owns the turn lifecycle (load, dispatch, execute, persist);
//! handlers own the behavior of each conversation state.

mod engine;
mod error;
mod handlers;

pub use engine::{ConversationEngine, EngineSettings, TurnReport, DEFAULT_FOLLOW_UP_DELAY};
pub use error::{Collaborator, TurnError};
pub use handlers::TurnOutcome;
