//! SHIPPING_METHOD - pickup address or handoff to the courier.
//!
//! Neither branch moves the dialogue on; the order flow ends here until the
//! user starts over.

use crate::domain::conversation::screens::{courier_order_text, pickup_text, FOLLOW_UP, ORDER_ACCEPTED};
use crate::domain::conversation::{payloads, Effect, InboundEvent};

use super::{cart, Turn, TurnError, TurnOutcome};

pub(super) async fn handle(turn: &mut Turn<'_>) -> Result<TurnOutcome, TurnError> {
    let event = turn.event;
    let press = match event {
        InboundEvent::ButtonPress(press) => press,
        _ => return Ok(TurnOutcome::ignored()),
    };

    let nearest = turn
        .context
        .nearest_pizzeria
        .clone()
        .ok_or(TurnError::MissingContext("nearest pizzeria"))?;

    if press.payload == payloads::PICKUP {
        return Ok(TurnOutcome::stay().with_effect(Effect::send(turn.user, pickup_text(&nearest.address))));
    }

    let courier = turn
        .catalog
        .resolve_courier_for_address(&nearest.address)
        .await?;
    let (cart_summary, _) = cart::cart_screen(turn).await?;
    tracing::info!(%courier, address = %nearest.address, "Order handed to courier");

    // The customer is confirmed only once the courier has the order.
    Ok(TurnOutcome::stay()
        .with_effect(Effect::send(
            courier,
            courier_order_text(&cart_summary, turn.context.customer_coordinates.as_ref()),
        ))
        .with_effect(Effect::send(turn.user, ORDER_ACCEPTED))
        .with_effects(turn.delete_pressed_message())
        .with_effect(Effect::ScheduleMessage {
            to: turn.user,
            delay: turn.follow_up_delay,
            text: FOLLOW_UP.to_string(),
        }))
}
