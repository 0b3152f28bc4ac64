//! Session Store Port - Interface for persisting per-user dialogue state.
//!
//! Key-value semantics: one state token and one context document per user,
//! last write wins, no transactions. Implementations must tolerate
//! concurrent access to disjoint keys.

use async_trait::async_trait;

use crate::domain::conversation::{ConversationState, SessionContext};
use crate::domain::foundation::UserId;

/// Errors that can occur during session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize session data: {0}")]
    Serialization(String),
}

/// Port for loading and saving dialogue state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the raw state token for a user.
    ///
    /// The token is returned unparsed so that a corrupted value reaches the
    /// engine as such instead of being hidden by the store.
    ///
    /// # Returns
    /// `None` if the user has never been seen.
    async fn load_state(&self, user: UserId) -> Result<Option<String>, SessionStoreError>;

    /// Overwrite the state of a user.
    async fn save_state(
        &self,
        user: UserId,
        state: ConversationState,
    ) -> Result<(), SessionStoreError>;

    /// Load the working context of a user, empty when none is stored.
    async fn load_context(&self, user: UserId) -> Result<SessionContext, SessionStoreError>;

    /// Overwrite the working context of a user.
    async fn save_context(
        &self,
        user: UserId,
        context: &SessionContext,
    ) -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_error_displays_cause() {
        let err = SessionStoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Session store unavailable: connection refused");
    }

    #[test]
    fn serialization_error_mentions_serialize() {
        let err = SessionStoreError::Serialization("bad json".to_string());
        assert!(err.to_string().contains("serialize"));
    }
}
