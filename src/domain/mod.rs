//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors, state machine trait)
//! - `catalog` - Products and cart lines as displayed to the user
//! - `delivery` - Coordinates, nearest pizzeria and delivery tiers
//! - `conversation` - Dialogue states, events, context and effects

pub mod catalog;
pub mod conversation;
pub mod delivery;
pub mod foundation;
