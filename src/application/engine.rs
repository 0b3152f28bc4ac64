//! ConversationEngine - processes one inbound event to completion.
//!
//! A turn reads the stored state and context once, runs the handler of the
//! effective state, executes the returned effects and only then writes the
//! new state and context back. Any error before the writes leaves the stored
//! session untouched.
//!
//! The engine does no locking of its own: turns of the same user must be
//! delivered one at a time by the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::domain::conversation::{ConversationState, Effect, InboundEvent};
use crate::domain::foundation::{StateMachine, UserId};
use crate::ports::{CatalogClient, Geocoder, SessionStore, Transport};

use super::handlers::{dispatch, Turn, TurnOutcome};
use super::TurnError;

/// Default delay of the courtesy message sent after an order.
pub const DEFAULT_FOLLOW_UP_DELAY: Duration = Duration::from_secs(3600);

/// Tunables of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub follow_up_delay: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY,
        }
    }
}

/// What a completed turn did.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// State whose handler ran.
    pub handled_in: ConversationState,
    /// State persisted by this turn, `None` when the stored state was kept.
    pub next_state: Option<ConversationState>,
    /// Effects executed, in order.
    pub effects: Vec<Effect>,
}

/// Runs turns against the session store, catalog, geocoder and transport.
#[derive(Clone)]
pub struct ConversationEngine {
    sessions: Arc<dyn SessionStore>,
    catalog: Arc<dyn CatalogClient>,
    geocoder: Arc<dyn Geocoder>,
    transport: Arc<dyn Transport>,
    settings: EngineSettings,
}

impl ConversationEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        catalog: Arc<dyn CatalogClient>,
        geocoder: Arc<dyn Geocoder>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            sessions,
            catalog,
            geocoder,
            transport,
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Processes one event of `user`.
    ///
    /// # Errors
    ///
    /// - `UnknownState` if the stored state token is corrupted
    /// - `CollaboratorUnavailable` if any external call fails
    /// - `MissingContext` / `NoPizzerias` if the session cannot continue
    ///
    /// On error nothing is persisted.
    pub async fn handle_event(
        &self,
        user: UserId,
        event: InboundEvent,
    ) -> Result<TurnReport, TurnError> {
        let span = tracing::info_span!("turn", %user, event = event.kind());
        self.run_turn(user, event).instrument(span).await
    }

    async fn run_turn(&self, user: UserId, event: InboundEvent) -> Result<TurnReport, TurnError> {
        let state = self.effective_state(user, &event).await?;
        let original_context = self.sessions.load_context(user).await?;
        let mut context = original_context.clone();

        let outcome = {
            let mut turn = Turn {
                user,
                event: &event,
                context: &mut context,
                catalog: self.catalog.as_ref(),
                geocoder: self.geocoder.as_ref(),
                follow_up_delay: self.settings.follow_up_delay,
            };
            dispatch(state, &mut turn).await?
        };

        if outcome.is_noop() {
            tracing::debug!(state = state.as_str(), "Event ignored in this state");
        }
        if let Some(next) = outcome.next_state {
            if next != state && !state.can_transition_to(&next) {
                tracing::warn!(from = state.as_str(), to = next.as_str(), "Unusual transition");
            }
        }

        let TurnOutcome { next_state, effects } = outcome;
        self.execute(&effects).await?;

        if context != original_context {
            self.sessions.save_context(user, &context).await?;
        }
        if let Some(next) = next_state {
            self.sessions.save_state(user, next).await?;
        }

        tracing::info!(
            from = state.as_str(),
            to = next_state.map(|s| s.as_str()).unwrap_or("-"),
            effects = effects.len(),
            "Turn completed"
        );

        Ok(TurnReport {
            handled_in: state,
            next_state,
            effects,
        })
    }

    /// `/start` and the cart shortcut override whatever is stored.
    async fn effective_state(
        &self,
        user: UserId,
        event: &InboundEvent,
    ) -> Result<ConversationState, TurnError> {
        if event.is_start() {
            return Ok(ConversationState::Start);
        }
        if event.is_cart_shortcut() {
            return Ok(ConversationState::Cart);
        }
        match self.sessions.load_state(user).await? {
            None => Ok(ConversationState::Start),
            Some(token) => token.parse().map_err(|_| {
                tracing::error!(token = %token, "Stored conversation state is corrupted");
                TurnError::UnknownState(token)
            }),
        }
    }

    async fn execute(&self, effects: &[Effect]) -> Result<(), TurnError> {
        for effect in effects {
            match effect {
                Effect::SendMessage { to, text, keyboard } => {
                    self.transport
                        .send_message(*to, text, keyboard.as_ref())
                        .await?;
                }
                Effect::SendPhoto {
                    to,
                    url,
                    caption,
                    keyboard,
                } => {
                    self.transport
                        .send_photo(*to, url, caption, keyboard.as_ref())
                        .await?;
                }
                Effect::DeleteMessage { chat, message_id } => {
                    if let Err(e) = self.transport.delete_message(*chat, *message_id).await {
                        tracing::warn!(error = %e, %message_id, "Failed to delete message");
                    }
                }
                Effect::AnswerButton { query_id } => {
                    if let Err(e) = self.transport.answer_button(query_id).await {
                        tracing::warn!(error = %e, "Failed to answer button press");
                    }
                }
                Effect::ScheduleMessage { to, delay, text } => {
                    self.transport.schedule_message(*to, *delay, text.clone());
                }
            }
        }
        Ok(())
    }
}
