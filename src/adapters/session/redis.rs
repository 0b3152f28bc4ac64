//! Redis-backed session store for production deployments.
//!
//! One string key per user for the state token and one for the JSON
//! context. Keys carry no TTL; an abandoned conversation simply resumes
//! where it stopped.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::conversation::{ConversationState, SessionContext};
use crate::domain::foundation::UserId;
use crate::ports::{SessionStore, SessionStoreError};

/// Session store over a multiplexed Redis connection.
///
/// The connection is cloned per call; commands from different users are
/// pipelined over the same socket.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(unavailable)?;
        Ok(Self::new(conn, key_prefix))
    }

    fn state_key(&self, user: UserId) -> String {
        format!("{}:state:{}", self.key_prefix, user)
    }

    fn context_key(&self, user: UserId) -> String {
        format!("{}:context:{}", self.key_prefix, user)
    }
}

fn unavailable(e: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Unavailable(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load_state(&self, user: UserId) -> Result<Option<String>, SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.get(self.state_key(user)).await.map_err(unavailable)
    }

    async fn save_state(
        &self,
        user: UserId,
        state: ConversationState,
    ) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.state_key(user), state.as_str())
            .await
            .map_err(unavailable)
    }

    async fn load_context(&self, user: UserId) -> Result<SessionContext, SessionStoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.context_key(user)).await.map_err(unavailable)?;
        match raw {
            None => Ok(SessionContext::default()),
            Some(json) => decode_context(&json),
        }
    }

    async fn save_context(
        &self,
        user: UserId,
        context: &SessionContext,
    ) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(context)
            .map_err(|e| SessionStoreError::Serialization(e.to_string()))?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.context_key(user), json)
            .await
            .map_err(unavailable)
    }
}

fn decode_context(json: &str) -> Result<SessionContext, SessionStoreError> {
    serde_json::from_str(json).map_err(|e| SessionStoreError::Serialization(e.to_string()))
}
