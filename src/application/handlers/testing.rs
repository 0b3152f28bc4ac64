//! Shared fixture for handler tests.

use std::time::Duration;

use crate::adapters::catalog::InMemoryCatalog;
use crate::adapters::geocoder::StaticGeocoder;
use crate::application::TurnError;
use crate::domain::conversation::{ButtonPress, ConversationState, InboundEvent, SessionContext};
use crate::domain::delivery::{Coordinates, PizzeriaLocation};
use crate::domain::foundation::{MessageId, UserId};

use super::{dispatch, Turn, TurnOutcome};

pub const PIZZERIA_ADDRESS: &str = "Тверская, 1";
pub const COURIER: UserId = UserId::new(900);

/// About 4 km north of the central pizzeria.
pub fn customer_4km() -> Coordinates {
    Coordinates::new(55.787244, 37.618423).unwrap()
}

/// About 25 km north of the central pizzeria.
pub fn customer_25km() -> Coordinates {
    Coordinates::new(55.976044, 37.618423).unwrap()
}

pub struct Harness {
    pub user: UserId,
    pub context: SessionContext,
    pub catalog: InMemoryCatalog,
    pub geocoder: StaticGeocoder,
}

impl Harness {
    pub fn new() -> Self {
        let catalog = InMemoryCatalog::new()
            .with_product(
                "margherita",
                "Маргарита",
                "Томаты, моцарелла",
                500,
                Some("https://img.example/margherita.png"),
            )
            .with_product("pepperoni", "Пепперони", "Колбаски", 600, None)
            .with_pizzeria(PizzeriaLocation {
                address: PIZZERIA_ADDRESS.to_string(),
                coordinates: Coordinates::new(55.751244, 37.618423).unwrap(),
                courier: Some(COURIER),
            })
            .with_pizzeria(PizzeriaLocation {
                address: "Варшавское шоссе, 140".to_string(),
                coordinates: Coordinates::new(55.600000, 37.618423).unwrap(),
                courier: None,
            });
        let geocoder = StaticGeocoder::new().with_address("123 Main St", customer_4km());

        Self {
            user: UserId::new(42),
            context: SessionContext::default(),
            catalog,
            geocoder,
        }
    }

    /// A button press carrying the message it was attached to.
    pub fn pressed(&self, payload: &str, message_id: i64) -> InboundEvent {
        InboundEvent::ButtonPress(ButtonPress {
            payload: payload.to_string(),
            message_id: Some(MessageId::new(message_id)),
            query_id: None,
        })
    }

    pub async fn run(
        &mut self,
        state: ConversationState,
        event: InboundEvent,
    ) -> Result<TurnOutcome, TurnError> {
        let mut turn = Turn {
            user: self.user,
            event: &event,
            context: &mut self.context,
            catalog: &self.catalog,
            geocoder: &self.geocoder,
            follow_up_delay: Duration::from_secs(3600),
        };
        dispatch(state, &mut turn).await
    }
}
