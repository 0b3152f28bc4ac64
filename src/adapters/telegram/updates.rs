//! Telegram update → `InboundEvent`.

use crate::domain::conversation::{ButtonPress, InboundEvent};
use crate::domain::delivery::Coordinates;
use crate::domain::foundation::{MessageId, UserId};

use super::api::{CallbackQuery, Message, Update};

/// Normalizes an update into the user it belongs to and the event.
///
/// Returns `None` for updates the bot does not react to (stickers, edits,
/// buttons without data, locations with invalid coordinates).
pub fn normalize_update(update: &Update) -> Option<(UserId, InboundEvent)> {
    if let Some(query) = &update.callback_query {
        return normalize_callback(query);
    }
    update.message.as_ref().and_then(normalize_message)
}

fn normalize_callback(query: &CallbackQuery) -> Option<(UserId, InboundEvent)> {
    let payload = query.data.clone()?;
    let user = query
        .message
        .as_ref()
        .map(|m| UserId::new(m.chat.id))
        .unwrap_or_else(|| UserId::new(query.from.id));
    Some((
        user,
        InboundEvent::ButtonPress(ButtonPress {
            payload,
            message_id: query.message.as_ref().map(|m| MessageId::new(m.message_id)),
            query_id: Some(query.id.clone()),
        }),
    ))
}

fn normalize_message(message: &Message) -> Option<(UserId, InboundEvent)> {
    let user = UserId::new(message.chat.id);

    if let Some(location) = message.location {
        return match Coordinates::new(location.latitude, location.longitude) {
            Ok(coordinates) => Some((user, InboundEvent::location(coordinates))),
            Err(e) => {
                tracing::warn!(%user, error = %e, "Ignoring invalid shared location");
                None
            }
        };
    }

    let text = message.text.as_deref()?;
    match text.strip_prefix('/') {
        Some(command) => Some((user, InboundEvent::command(command_name(command)))),
        None => Some((user, InboundEvent::text(text))),
    }
}

/// "start@pizza_bot arg" → "start".
fn command_name(command: &str) -> &str {
    let word = command.split_whitespace().next().unwrap_or("");
    word.split('@').next().unwrap_or(word)
}
