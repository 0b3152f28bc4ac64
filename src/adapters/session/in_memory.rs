//! In-Memory Session Store Adapter
//!
//! Stores state tokens and contexts in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{ConversationState, SessionContext};
use crate::domain::foundation::UserId;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for dialogue sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    states: Arc<RwLock<HashMap<UserId, String>>>,
    contexts: Arc<RwLock<HashMap<UserId, SessionContext>>>,
    state_writes: Arc<AtomicUsize>,
    context_writes: Arc<AtomicUsize>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw token, bypassing validation (used to simulate corruption).
    pub async fn put_state(&self, user: UserId, token: &str) {
        self.states.write().await.insert(user, token.to_string());
    }

    /// Raw stored token of a user.
    pub async fn state_of(&self, user: UserId) -> Option<String> {
        self.states.read().await.get(&user).cloned()
    }

    /// Number of `save_state` calls.
    pub fn state_writes(&self) -> usize {
        self.state_writes.load(Ordering::SeqCst)
    }

    /// Number of `save_context` calls.
    pub fn context_writes(&self) -> usize {
        self.context_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load_state(&self, user: UserId) -> Result<Option<String>, SessionStoreError> {
        Ok(self.states.read().await.get(&user).cloned())
    }

    async fn save_state(
        &self,
        user: UserId,
        state: ConversationState,
    ) -> Result<(), SessionStoreError> {
        self.state_writes.fetch_add(1, Ordering::SeqCst);
        self.states
            .write()
            .await
            .insert(user, state.as_str().to_string());
        Ok(())
    }

    async fn load_context(&self, user: UserId) -> Result<SessionContext, SessionStoreError> {
        Ok(self
            .contexts
            .read()
            .await
            .get(&user)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_context(
        &self,
        user: UserId,
        context: &SessionContext,
    ) -> Result<(), SessionStoreError> {
        self.context_writes.fetch_add(1, Ordering::SeqCst);
        self.contexts.write().await.insert(user, context.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unseen_user_has_no_state_and_empty_context() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(1);
        assert_eq!(store.load_state(user).await.unwrap(), None);
        assert!(store.load_context(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = InMemorySessionStore::new();
        let user = UserId::new(1);
        store.save_state(user, ConversationState::Menu).await.unwrap();
        store.save_state(user, ConversationState::Cart).await.unwrap();
        assert_eq!(store.load_state(user).await.unwrap(), Some("CART".to_string()));
        assert_eq!(store.state_writes(), 2);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = InMemorySessionStore::new();
        store
            .save_state(UserId::new(1), ConversationState::Cart)
            .await
            .unwrap();
        assert_eq!(store.load_state(UserId::new(2)).await.unwrap(), None);
    }
}
