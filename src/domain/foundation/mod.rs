//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, error types and the state machine trait
//! that form the vocabulary of the ordering domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::{MessageId, UserId};
pub use state_machine::StateMachine;
