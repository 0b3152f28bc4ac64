//! State handlers - one module per conversation state.
//!
//! Each handler receives the turn (user, event, working context and the
//! catalog/geocoder clients), performs its queries and cart mutations, and
//! returns the next state together with the effects to show the user.

mod cart;
mod delivery_terms;
mod item_detail;
mod location;
mod menu;
mod shipping;
mod start;

use std::time::Duration;

use crate::domain::conversation::{ConversationState, Effect, InboundEvent, SessionContext};
use crate::domain::foundation::UserId;
use crate::ports::{CatalogClient, Geocoder};

use super::TurnError;

/// Everything a handler may read or mutate during one turn.
pub(crate) struct Turn<'a> {
    pub user: UserId,
    pub event: &'a InboundEvent,
    pub context: &'a mut SessionContext,
    pub catalog: &'a dyn CatalogClient,
    pub geocoder: &'a dyn Geocoder,
    pub follow_up_delay: Duration,
}

impl Turn<'_> {
    /// Deletes the message whose button was pressed, replacing the screen.
    fn delete_pressed_message(&self) -> Option<Effect> {
        self.event
            .pressed_message()
            .map(|message_id| Effect::DeleteMessage {
                chat: self.user,
                message_id,
            })
    }
}

/// What a handler decided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOutcome {
    /// `None` leaves the stored state untouched.
    pub next_state: Option<ConversationState>,
    pub effects: Vec<Effect>,
}

impl TurnOutcome {
    pub fn goto(state: ConversationState) -> Self {
        Self {
            next_state: Some(state),
            effects: Vec::new(),
        }
    }

    /// Keep the stored state.
    pub fn stay() -> Self {
        Self::default()
    }

    /// The event means nothing in this state: no transition, no message.
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn is_noop(&self) -> bool {
        self.next_state.is_none() && self.effects.is_empty()
    }
}

/// Runs the handler registered for `state`.
///
/// The match is exhaustive, so every state has exactly one handler.
pub(crate) async fn dispatch(
    state: ConversationState,
    turn: &mut Turn<'_>,
) -> Result<TurnOutcome, TurnError> {
    match state {
        ConversationState::Start => start::handle(turn).await,
        ConversationState::Menu => menu::handle(turn).await,
        ConversationState::ItemDetail => item_detail::handle(turn).await,
        ConversationState::Cart => cart::handle(turn).await,
        ConversationState::LocationWait => location::handle(turn).await,
        ConversationState::DeliveryTerms => delivery_terms::handle(turn).await,
        ConversationState::ShippingMethod => shipping::handle(turn).await,
    }
}

#[cfg(test)]
pub(crate) mod testing;
