//! Conversation state machine.
//!
//! Exactly one state is stored per user. A user without a stored state is
//! implicitly at `Start`. Stored tokens that do not name a state are
//! rejected rather than reset, since silently restarting would lose the
//! order in flight.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::foundation::StateMachine;

/// The step of the ordering dialogue a user is currently at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationState {
    /// No dialogue yet, or explicitly restarted.
    #[default]
    Start,
    /// Product list shown, waiting for a selection.
    Menu,
    /// Product card shown, waiting for add-to-cart / back / cart.
    ItemDetail,
    /// Cart shown, waiting for removal / payment.
    Cart,
    /// Waiting for an address as text or a shared location.
    LocationWait,
    /// Delivery terms are being computed for known coordinates.
    DeliveryTerms,
    /// Terms shown, waiting for delivery or pickup.
    ShippingMethod,
}

/// All states, in dialogue order.
pub const ALL_STATES: [ConversationState; 7] = [
    ConversationState::Start,
    ConversationState::Menu,
    ConversationState::ItemDetail,
    ConversationState::Cart,
    ConversationState::LocationWait,
    ConversationState::DeliveryTerms,
    ConversationState::ShippingMethod,
];

/// A stored state token that names no known state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown conversation state token: {0:?}")]
pub struct UnknownStateError(pub String);

impl ConversationState {
    /// Token used in the session store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Menu => "MENU",
            Self::ItemDetail => "ITEM_DETAIL",
            Self::Cart => "CART",
            Self::LocationWait => "LOCATION_WAIT",
            Self::DeliveryTerms => "DELIVERY_TERMS",
            Self::ShippingMethod => "SHIPPING_METHOD",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationState {
    type Err = UnknownStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATES
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownStateError(s.to_string()))
    }
}

impl StateMachine for ConversationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationState::*;
        matches!(
            (self, target),
            // Product list rendered
            (Start, Menu) |
            // Product picked, or cart opened from the menu
            (Menu, ItemDetail) |
            (Menu, Cart) |
            // Back to the list, or on to the cart
            (ItemDetail, Menu) |
            (ItemDetail, Cart) |
            // Checkout started
            (Cart, LocationWait) |
            // Address resolved within delivery range
            (LocationWait, ShippingMethod) |
            (DeliveryTerms, ShippingMethod)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationState::*;
        match self {
            Start => vec![Menu],
            Menu => vec![ItemDetail, Cart],
            ItemDetail => vec![Menu, Cart],
            Cart => vec![LocationWait],
            LocationWait => vec![ShippingMethod],
            DeliveryTerms => vec![ShippingMethod],
            ShippingMethod => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod tokens {
        use super::*;

        #[test]
        fn default_state_is_start() {
            assert_eq!(ConversationState::default(), ConversationState::Start);
        }

        #[test]
        fn every_state_round_trips_through_its_token() {
            for state in ALL_STATES {
                assert_eq!(state.as_str().parse::<ConversationState>(), Ok(state));
            }
        }

        #[test]
        fn serde_uses_the_store_token() {
            let json = serde_json::to_string(&ConversationState::LocationWait).unwrap();
            assert_eq!(json, "\"LOCATION_WAIT\"");
        }

        #[test]
        fn unknown_token_is_rejected() {
            let err = "HANDLE_SOMETHING".parse::<ConversationState>().unwrap_err();
            assert_eq!(err, UnknownStateError("HANDLE_SOMETHING".to_string()));
        }

        #[test]
        fn tokens_are_case_sensitive() {
            assert!("menu".parse::<ConversationState>().is_err());
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn shipping_method_is_terminal() {
            assert!(ConversationState::ShippingMethod.is_terminal());
        }

        #[test]
        fn start_only_leads_to_menu() {
            assert_eq!(
                ConversationState::Start.valid_transitions(),
                vec![ConversationState::Menu]
            );
        }

        #[test]
        fn cart_cannot_skip_to_shipping() {
            assert!(ConversationState::Cart
                .transition_to(ConversationState::ShippingMethod)
                .is_err());
        }

        #[test]
        fn can_transition_to_is_consistent_with_valid_transitions() {
            for state in ALL_STATES {
                for target in state.valid_transitions() {
                    assert!(
                        state.can_transition_to(&target),
                        "{:?} -> {:?} listed but rejected",
                        state,
                        target
                    );
                }
                for target in ALL_STATES {
                    if state.can_transition_to(&target) {
                        assert!(state.valid_transitions().contains(&target));
                    }
                }
            }
        }
    }
}
