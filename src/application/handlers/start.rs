//! START - render the product list.

use crate::domain::conversation::screens::{menu_keyboard, MENU_PROMPT};
use crate::domain::conversation::{ConversationState, Effect};

use super::{Turn, TurnError, TurnOutcome};

pub(super) async fn handle(turn: &mut Turn<'_>) -> Result<TurnOutcome, TurnError> {
    let products = turn.catalog.list_products().await?;
    tracing::debug!(count = products.len(), "Rendering menu");

    Ok(TurnOutcome::goto(ConversationState::Menu)
        .with_effect(Effect::send_with_keyboard(
            turn.user,
            MENU_PROMPT,
            menu_keyboard(&products),
        ))
        .with_effects(turn.delete_pressed_message()))
}
