//! ITEM_DETAIL - add the shown product to the cart, or navigate away.

use crate::domain::conversation::{payloads, ConversationState, Effect, InboundEvent};

use super::{start, Turn, TurnError, TurnOutcome};

pub(super) async fn handle(turn: &mut Turn<'_>) -> Result<TurnOutcome, TurnError> {
    let event = turn.event;
    let press = match event {
        InboundEvent::ButtonPress(press) => press,
        _ => return Ok(TurnOutcome::ignored()),
    };

    match press.payload.as_str() {
        payloads::BACK => start::handle(turn).await,
        payloads::CART => Ok(TurnOutcome::goto(ConversationState::Cart)),
        payloads::ADD_TO_CART => {
            let product_id = turn
                .context
                .selected_product_id
                .clone()
                .ok_or(TurnError::MissingContext("selected product"))?;
            turn.catalog.add_to_cart(turn.user, &product_id, 1).await?;
            tracing::info!(product_id = %product_id, "Product added to cart");

            Ok(TurnOutcome::stay().with_effects(press.query_id.clone().map(|query_id| {
                Effect::AnswerButton { query_id }
            })))
        }
        _ => Ok(TurnOutcome::ignored()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use crate::application::TurnError;
    use crate::domain::conversation::{ButtonPress, ConversationState, Effect, InboundEvent};

    #[tokio::test]
    async fn add_to_cart_adds_one_and_stays() {
        let mut h = Harness::new();
        h.context.select_product("margherita");
        let event = InboundEvent::ButtonPress(ButtonPress {
            payload: "add_to_cart".to_string(),
            message_id: None,
            query_id: Some("q-1".to_string()),
        });

        let outcome = h.run(ConversationState::ItemDetail, event).await.unwrap();

        assert_eq!(outcome.next_state, None);
        assert_eq!(
            outcome.effects,
            vec![Effect::AnswerButton {
                query_id: "q-1".to_string()
            }]
        );
        let lines = h.catalog.cart(h.user);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, "margherita");
        assert_eq!(lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn add_without_selection_is_missing_context() {
        let mut h = Harness::new();
        let result = h
            .run(ConversationState::ItemDetail, InboundEvent::button("add_to_cart"))
            .await;
        assert_eq!(result, Err(TurnError::MissingContext("selected product")));
    }

    #[tokio::test]
    async fn back_rerenders_menu() {
        let mut h = Harness::new();
        let outcome = h.run(ConversationState::ItemDetail, InboundEvent::button("back")).await.unwrap();
        assert_eq!(outcome.next_state, Some(ConversationState::Menu));
        assert!(matches!(outcome.effects[0], Effect::SendMessage { .. }));
    }

    #[tokio::test]
    async fn cart_moves_to_cart() {
        let mut h = Harness::new();
        let outcome = h.run(ConversationState::ItemDetail, InboundEvent::button("cart")).await.unwrap();
        assert_eq!(outcome.next_state, Some(ConversationState::Cart));
    }

    #[tokio::test]
    async fn stale_product_button_does_not_add() {
        let mut h = Harness::new();
        h.context.select_product("margherita");
        let outcome = h
            .run(ConversationState::ItemDetail, InboundEvent::button("pepperoni"))
            .await
            .unwrap();
        assert!(outcome.is_noop());
        assert!(h.catalog.cart(h.user).is_empty());
    }
}
