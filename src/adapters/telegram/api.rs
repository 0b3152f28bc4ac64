//! Telegram Bot API wire types.
//!
//! Only the fields the bot reads are modelled; everything else in an update
//! is ignored by serde.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::conversation::Keyboard;

/// Envelope of every Bot API answer.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// Absent for buttons on inline-mode messages.
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// Parameters of `getUpdates`.
#[derive(Debug, Serialize)]
pub struct GetUpdates {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

/// `reply_markup` for a keyboard.
pub fn reply_markup(keyboard: &Keyboard) -> Value {
    match keyboard {
        Keyboard::Inline(rows) => json!({
            "inline_keyboard": rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|b| json!({ "text": b.label, "callback_data": b.payload }))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        }),
        Keyboard::RequestLocation { label } => json!({
            "keyboard": [[{ "text": label, "request_location": true }]],
            "resize_keyboard": true,
            "one_time_keyboard": true,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Button;

    #[test]
    fn inline_keyboard_keeps_rows() {
        let keyboard = Keyboard::Inline(vec![
            vec![Button::new("A", "a"), Button::new("B", "b")],
            vec![Button::new("C", "c")],
        ]);
        let markup = reply_markup(&keyboard);
        assert_eq!(markup["inline_keyboard"][0][1]["callback_data"], "b");
        assert_eq!(markup["inline_keyboard"][1][0]["text"], "C");
    }

    #[test]
    fn location_keyboard_requests_location() {
        let markup = reply_markup(&Keyboard::RequestLocation {
            label: "Send".to_string(),
        });
        assert_eq!(markup["keyboard"][0][0]["request_location"], true);
        assert_eq!(markup["one_time_keyboard"], true);
    }

    #[test]
    fn error_envelope_parses() {
        let body = r#"{"ok": false, "error_code": 400, "description": "Bad Request: message to delete not found"}"#;
        let parsed: ApiResponse<bool> = serde_json::from_str(body).unwrap();
        assert!(!parsed.ok);
        assert!(parsed.result.is_none());
        assert!(parsed.description.unwrap().contains("not found"));
    }
}
