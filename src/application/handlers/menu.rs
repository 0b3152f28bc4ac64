//! MENU - show the selected product's card.

use crate::domain::conversation::screens::{product_caption, product_keyboard};
use crate::domain::conversation::{payloads, ConversationState, Effect, InboundEvent};

use super::{Turn, TurnError, TurnOutcome};

pub(super) async fn handle(turn: &mut Turn<'_>) -> Result<TurnOutcome, TurnError> {
    let product_id = match turn.event {
        InboundEvent::ButtonPress(press) if press.payload == payloads::CART => {
            // entering CART renders it; nothing to show here
            return Ok(TurnOutcome::goto(ConversationState::Cart));
        }
        InboundEvent::ButtonPress(press) => press.payload.clone(),
        _ => return Ok(TurnOutcome::ignored()),
    };

    let product = turn.catalog.get_product(&product_id).await?;
    let image_url = turn.catalog.get_image_url(&product_id).await?;
    let caption = product_caption(&product);

    let card = match image_url {
        Some(url) => Effect::SendPhoto {
            to: turn.user,
            url,
            caption,
            keyboard: Some(product_keyboard()),
        },
        None => Effect::send_with_keyboard(turn.user, caption, product_keyboard()),
    };

    turn.context.select_product(product_id);

    Ok(TurnOutcome::goto(ConversationState::ItemDetail)
        .with_effect(card)
        .with_effects(turn.delete_pressed_message()))
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use crate::domain::conversation::{ConversationState, Effect, InboundEvent};

    #[tokio::test]
    async fn shows_photo_card_and_remembers_product() {
        let mut h = Harness::new();
        let outcome = h
            .run(ConversationState::Menu, InboundEvent::button("margherita"))
            .await
            .unwrap();

        assert_eq!(outcome.next_state, Some(ConversationState::ItemDetail));
        assert_eq!(h.context.selected_product_id.as_deref(), Some("margherita"));
        match &outcome.effects[0] {
            Effect::SendPhoto { url, caption, keyboard, .. } => {
                assert_eq!(url, "https://img.example/margherita.png");
                assert!(caption.contains("Маргарита"));
                assert!(caption.contains("500 ₽"));
                assert_eq!(keyboard.as_ref().unwrap().payloads(), vec!["add_to_cart", "back"]);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[tokio::test]
    async fn falls_back_to_text_without_image() {
        let mut h = Harness::new();
        let outcome = h
            .run(ConversationState::Menu, InboundEvent::button("pepperoni"))
            .await
            .unwrap();
        assert!(matches!(outcome.effects[0], Effect::SendMessage { .. }));
    }

    #[tokio::test]
    async fn cart_shortcut_transitions_silently() {
        let mut h = Harness::new();
        let outcome = h.run(ConversationState::Menu, InboundEvent::button("cart")).await.unwrap();
        assert_eq!(outcome.next_state, Some(ConversationState::Cart));
        assert!(outcome.effects.is_empty());
    }

    #[tokio::test]
    async fn stray_text_is_ignored() {
        let mut h = Harness::new();
        let outcome = h.run(ConversationState::Menu, InboundEvent::text("hello")).await.unwrap();
        assert!(outcome.is_noop());
        assert!(h.context.is_empty());
    }

    #[tokio::test]
    async fn unknown_product_aborts_without_selecting() {
        let mut h = Harness::new();
        let result = h.run(ConversationState::Menu, InboundEvent::button("sushi")).await;
        assert!(result.is_err());
        assert!(h.context.selected_product_id.is_none());
    }
}
