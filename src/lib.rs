//! Pizza Bot - conversational pizza ordering over Telegram
//!
//! This crate implements the ordering conversation (menu, cart, delivery
//! address) as a state machine, and the distance-based decision between
//! pickup, tiered delivery and refusal.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
