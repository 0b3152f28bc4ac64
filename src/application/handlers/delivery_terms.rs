//! DELIVERY_TERMS - turn the distance to the nearest pizzeria into an offer.
//!
//! Out-of-range customers get a refusal without shipping buttons and the
//! dialogue does not advance; everyone else moves on to choosing between
//! delivery and pickup.

use crate::domain::conversation::screens::{delivery_terms_text, shipping_keyboard};
use crate::domain::conversation::{ConversationState, Effect};
use crate::domain::delivery::{find_nearest, Coordinates, DeliveryDecision};

use super::{Turn, TurnError, TurnOutcome};

pub(super) async fn handle(turn: &mut Turn<'_>) -> Result<TurnOutcome, TurnError> {
    let customer = turn
        .context
        .customer_coordinates
        .ok_or(TurnError::MissingContext("customer coordinates"))?;
    offer(turn, customer).await
}

pub(super) async fn offer(
    turn: &mut Turn<'_>,
    customer: Coordinates,
) -> Result<TurnOutcome, TurnError> {
    let pizzerias = turn.catalog.list_pizzerias().await?;
    let nearest = find_nearest(&customer, &pizzerias).ok_or(TurnError::NoPizzerias)?;
    let decision = DeliveryDecision::for_distance(nearest.distance_km);
    tracing::info!(
        distance_km = nearest.distance_km,
        address = %nearest.address,
        ?decision,
        "Delivery terms computed"
    );

    let effect = Effect::SendMessage {
        to: turn.user,
        text: delivery_terms_text(decision, &nearest),
        keyboard: shipping_keyboard(decision),
    };
    turn.context.record_nearest(nearest);

    let outcome = if decision.offers_shipping() {
        TurnOutcome::goto(ConversationState::ShippingMethod)
    } else {
        TurnOutcome::stay()
    };
    Ok(outcome.with_effect(effect))
}
