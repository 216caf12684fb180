//! In-memory board state.
//!
//! # Responsibility
//! - Own the ordered card list and the closing-draft mapping.
//! - Keep both free of any persistence concern.
//!
//! # Invariants
//! - The two stores only relate through card ids.
//! - Reading a card to seed a draft never mutates the card list.

pub mod card_store;
pub mod closing_store;
