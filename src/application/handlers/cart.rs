//! CART - render the cart, remove lines, or start checkout.

use crate::domain::conversation::screens::{
    cart_keyboard, cart_text, location_keyboard, LOCATION_PROMPT,
};
use crate::domain::conversation::{payloads, ConversationState, Effect, InboundEvent, Keyboard};

use super::{Turn, TurnError, TurnOutcome};

pub(super) async fn handle(turn: &mut Turn<'_>) -> Result<TurnOutcome, TurnError> {
    let event = turn.event;
    let press = match event {
        InboundEvent::ButtonPress(press) => press,
        _ => return Ok(TurnOutcome::ignored()),
    };

    match press.payload.as_str() {
        payloads::CART => render(turn).await,
        payloads::PAYMENT => Ok(TurnOutcome::goto(ConversationState::LocationWait)
            .with_effect(Effect::send_with_keyboard(
                turn.user,
                LOCATION_PROMPT,
                location_keyboard(),
            ))
            .with_effects(turn.delete_pressed_message())),
        line_id => {
            turn.catalog.remove_from_cart(turn.user, line_id).await?;
            tracing::info!(line_id = %line_id, "Cart line removed");
            render(turn).await
        }
    }
}

async fn render(turn: &Turn<'_>) -> Result<TurnOutcome, TurnError> {
    let (text, keyboard) = cart_screen(turn).await?;
    Ok(TurnOutcome::goto(ConversationState::Cart)
        .with_effect(Effect::send_with_keyboard(turn.user, text, keyboard))
        .with_effects(turn.delete_pressed_message()))
}

/// Cart text and keyboard for the user of this turn.
pub(super) async fn cart_screen(turn: &Turn<'_>) -> Result<(String, Keyboard), TurnError> {
    let lines = turn.catalog.list_cart_lines(turn.user).await?;
    let total = if lines.is_empty() {
        None
    } else {
        Some(turn.catalog.get_cart_total(turn.user).await?)
    };
    Ok((cart_text(&lines, total.as_deref()), cart_keyboard(&lines)))
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use crate::domain::conversation::screens::{EMPTY_CART, LOCATION_PROMPT};
    use crate::domain::conversation::{ConversationState, Effect, InboundEvent, Keyboard};
    use crate::domain::foundation::MessageId;

    fn sent_text(effect: &Effect) -> &str {
        match effect {
            Effect::SendMessage { text, .. } => text,
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[tokio::test]
    async fn renders_lines_total_and_buttons() {
        let mut h = Harness::new();
        h.catalog.seed_cart_line(h.user, "margherita", 2);

        let event = h.pressed("cart", 5);
        let outcome = h.run(ConversationState::Cart, event).await.unwrap();

        assert_eq!(outcome.next_state, Some(ConversationState::Cart));
        let text = sent_text(&outcome.effects[0]);
        assert!(text.contains("Маргарита"));
        assert!(text.contains("К оплате: 1000 ₽"));
        match &outcome.effects[0] {
            Effect::SendMessage { keyboard: Some(kb), .. } => {
                let payloads = kb.payloads();
                assert_eq!(payloads.last(), Some(&"payment"));
                assert!(payloads.contains(&"/start"));
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(
            outcome.effects[1],
            Effect::DeleteMessage {
                chat: h.user,
                message_id: MessageId::new(5)
            }
        );
    }

    #[tokio::test]
    async fn empty_cart_says_so_without_total() {
        let mut h = Harness::new();
        let outcome = h.run(ConversationState::Cart, InboundEvent::button("cart")).await.unwrap();
        assert_eq!(sent_text(&outcome.effects[0]), EMPTY_CART);
        assert_eq!(h.catalog.total_requests(), 0);
    }

    #[tokio::test]
    async fn removal_payload_removes_line_and_rerenders() {
        let mut h = Harness::new();
        let line_id = h.catalog.seed_cart_line(h.user, "margherita", 1);

        let outcome = h.run(ConversationState::Cart, InboundEvent::button(line_id)).await.unwrap();

        assert!(h.catalog.cart(h.user).is_empty());
        assert_eq!(outcome.next_state, Some(ConversationState::Cart));
        assert_eq!(sent_text(&outcome.effects[0]), EMPTY_CART);
    }

    #[tokio::test]
    async fn payment_prompts_for_location() {
        let mut h = Harness::new();
        h.catalog.seed_cart_line(h.user, "margherita", 1);

        let outcome = h.run(ConversationState::Cart, InboundEvent::button("payment")).await.unwrap();

        assert_eq!(outcome.next_state, Some(ConversationState::LocationWait));
        match &outcome.effects[0] {
            Effect::SendMessage { text, keyboard, .. } => {
                assert_eq!(text, LOCATION_PROMPT);
                assert!(matches!(keyboard, Some(Keyboard::RequestLocation { .. })));
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[tokio::test]
    async fn text_in_cart_is_ignored() {
        let mut h = Harness::new();
        let outcome = h.run(ConversationState::Cart, InboundEvent::text("pay")).await.unwrap();
        assert!(outcome.is_noop());
    }
}
