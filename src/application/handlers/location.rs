//! LOCATION_WAIT - resolve where the customer is.
//!
//! A shared location is taken as-is; text goes through the geocoder. An
//! address the geocoder cannot resolve is answered with a re-prompt and the
//! state is left alone.

use crate::domain::conversation::screens::{location_keyboard, ADDRESS_NOT_RECOGNIZED, LOCATION_PROMPT};
use crate::domain::conversation::{ConversationState, Effect, InboundEvent};
use crate::domain::delivery::Coordinates;

use super::{delivery_terms, Turn, TurnError, TurnOutcome};

pub(super) async fn handle(turn: &mut Turn<'_>) -> Result<TurnOutcome, TurnError> {
    let event = turn.event;
    match event {
        InboundEvent::LocationShare(coordinates) => accept(turn, *coordinates).await,
        InboundEvent::TextMessage { text } => {
            let address = text.trim();
            let resolved = if address.is_empty() {
                None
            } else {
                turn.geocoder.geocode(address).await?
            };
            match resolved {
                Some(coordinates) => accept(turn, coordinates).await,
                None => {
                    tracing::info!(address = %address, "Address not recognized");
                    Ok(TurnOutcome::stay().with_effect(Effect::send_with_keyboard(
                        turn.user,
                        ADDRESS_NOT_RECOGNIZED,
                        location_keyboard(),
                    )))
                }
            }
        }
        InboundEvent::ButtonPress(_) | InboundEvent::Command { .. } => {
            Ok(TurnOutcome::goto(ConversationState::LocationWait)
                .with_effect(Effect::send_with_keyboard(
                    turn.user,
                    LOCATION_PROMPT,
                    location_keyboard(),
                ))
                .with_effects(turn.delete_pressed_message()))
        }
    }
}

async fn accept(turn: &mut Turn<'_>, coordinates: Coordinates) -> Result<TurnOutcome, TurnError> {
    turn.catalog
        .create_customer_address(turn.user, coordinates)
        .await?;
    turn.context.record_coordinates(coordinates);
    tracing::info!(%coordinates, "Customer location recorded");
    delivery_terms::offer(turn, coordinates).await
}

#[cfg(test)]
mod tests {
    use super::super::testing::{customer_4km, Harness};
    use crate::domain::conversation::screens::ADDRESS_NOT_RECOGNIZED;
    use crate::domain::conversation::{ConversationState, Effect, InboundEvent};

    #[tokio::test]
    async fn unresolvable_text_reprompts_and_stays() {
        let mut h = Harness::new();
        let outcome = h
            .run(ConversationState::LocationWait, InboundEvent::text("asdfgh"))
            .await
            .unwrap();

        assert_eq!(outcome.next_state, None);
        assert!(matches!(
            &outcome.effects[0],
            Effect::SendMessage { text, .. } if text == ADDRESS_NOT_RECOGNIZED
        ));
        assert!(h.context.customer_coordinates.is_none());
        assert!(h.catalog.customer_addresses().is_empty());
    }

    #[tokio::test]
    async fn blank_text_skips_the_geocoder() {
        let mut h = Harness::new();
        let outcome = h
            .run(ConversationState::LocationWait, InboundEvent::text("   "))
            .await
            .unwrap();
        assert_eq!(outcome.next_state, None);
        assert_eq!(h.geocoder.lookups(), 0);
    }

    #[tokio::test]
    async fn resolved_text_records_address_and_offers_terms() {
        let mut h = Harness::new();
        let outcome = h
            .run(ConversationState::LocationWait, InboundEvent::text("123 Main St"))
            .await
            .unwrap();

        assert_eq!(outcome.next_state, Some(ConversationState::ShippingMethod));
        assert_eq!(h.context.customer_coordinates, Some(customer_4km()));
        assert_eq!(h.catalog.customer_addresses(), vec![(h.user, customer_4km())]);
        assert!(h.context.nearest_pizzeria.is_some());
    }

    #[tokio::test]
    async fn shared_location_skips_the_geocoder() {
        let mut h = Harness::new();
        let outcome = h
            .run(ConversationState::LocationWait, InboundEvent::location(customer_4km()))
            .await
            .unwrap();

        assert_eq!(outcome.next_state, Some(ConversationState::ShippingMethod));
        assert_eq!(h.geocoder.lookups(), 0);
    }

    #[tokio::test]
    async fn button_renders_initial_prompt() {
        let mut h = Harness::new();
        let outcome = h
            .run(ConversationState::LocationWait, InboundEvent::button("payment"))
            .await
            .unwrap();
        assert_eq!(outcome.next_state, Some(ConversationState::LocationWait));
        assert_eq!(outcome.effects.len(), 1);
    }

    #[tokio::test]
    async fn geocoder_failure_aborts_the_turn() {
        let mut h = Harness::new();
        h.geocoder.fail_next("timeout");
        let result = h
            .run(ConversationState::LocationWait, InboundEvent::text("123 Main St"))
            .await;
        assert!(result.is_err());
        assert!(h.context.customer_coordinates.is_none());
    }
}
