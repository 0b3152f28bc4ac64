//! Telegram Bot API client and the `Transport` built on it.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::conversation::Keyboard;
use crate::domain::foundation::{MessageId, UserId};
use crate::ports::{Transport, TransportError};

use super::api::{reply_markup, ApiResponse, GetUpdates, Update};

/// Configuration for the Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    token: Secret<String>,
    /// Base URL (default: https://api.telegram.org).
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout: Duration,
    /// Timeout of every other request.
    pub request_timeout: Duration,
}

impl TelegramConfig {
    pub fn new(token: Secret<String>) -> Self {
        Self {
            token,
            api_url: "https://api.telegram.org".to_string(),
            poll_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}

/// Thin JSON client over `https://api.telegram.org/bot<token>/<method>`.
pub struct TelegramClient {
    config: TelegramConfig,
    http: Client,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self, TransportError> {
        // Long polls hold the connection open for the whole poll timeout.
        let http = Client::builder()
            .timeout(config.poll_timeout + config.request_timeout)
            .build()
            .map_err(|e| TransportError::Unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let url = format!(
            "{}/bot{}/{}",
            self.config.api_url,
            self.config.token.expose_secret(),
            method
        );
        tracing::debug!(method, "Telegram request");

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Unavailable(format!("{}: {}", method, e.without_url())))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            TransportError::Unavailable(format!("{} returned {}: {}", method, status, e.without_url()))
        })?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => {
                let message = format!(
                    "{}: {}",
                    method,
                    description.unwrap_or_else(|| status.to_string())
                );
                if status.is_server_error() {
                    Err(TransportError::Unavailable(message))
                } else {
                    Err(TransportError::Rejected(message))
                }
            }
        }
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: self.config.poll_timeout.as_secs(),
                allowed_updates: &["message", "callback_query"],
            },
        )
        .await
    }

    pub async fn send_message(
        &self,
        to: UserId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let mut body = json!({ "chat_id": to.as_i64(), "text": text });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = reply_markup(keyboard);
        }
        self.call::<_, Value>("sendMessage", &body).await.map(|_| ())
    }

    pub async fn send_photo(
        &self,
        to: UserId,
        url: &str,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let mut body = json!({ "chat_id": to.as_i64(), "photo": url, "caption": caption });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = reply_markup(keyboard);
        }
        self.call::<_, Value>("sendPhoto", &body).await.map(|_| ())
    }

    pub async fn delete_message(&self, chat: UserId, message_id: MessageId) -> Result<(), TransportError> {
        let body = json!({ "chat_id": chat.as_i64(), "message_id": message_id.as_i64() });
        self.call::<_, bool>("deleteMessage", &body).await.map(|_| ())
    }

    pub async fn answer_callback_query(&self, query_id: &str) -> Result<(), TransportError> {
        let body = json!({ "callback_query_id": query_id });
        self.call::<_, bool>("answerCallbackQuery", &body)
            .await
            .map(|_| ())
    }
}

/// `Transport` over the Bot API. Delayed messages run on the tokio runtime.
#[derive(Clone)]
pub struct TelegramTransport {
    client: Arc<TelegramClient>,
}

impl TelegramTransport {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_message(
        &self,
        to: UserId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        self.client.send_message(to, text, keyboard).await
    }

    async fn send_photo(
        &self,
        to: UserId,
        url: &str,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        self.client.send_photo(to, url, caption, keyboard).await
    }

    async fn delete_message(&self, chat: UserId, message_id: MessageId) -> Result<(), TransportError> {
        self.client.delete_message(chat, message_id).await
    }

    async fn answer_button(&self, query_id: &str) -> Result<(), TransportError> {
        self.client.answer_callback_query(query_id).await
    }

    fn schedule_message(&self, to: UserId, delay: Duration, text: String) {
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match client.send_message(to, &text, None).await {
                Ok(()) => tracing::info!(%to, "Delayed message delivered"),
                Err(e) => tracing::warn!(%to, error = %e, "Delayed message failed"),
            }
        });
        tracing::debug!(%to, delay_secs = delay.as_secs(), "Delayed message scheduled");
    }
}
