//! Learning-log domain model.
//!
//! # Responsibility
//! - Define the card record persisted by the board.
//! - Define the transient closing draft used while finishing a card.
//!
//! # Invariants
//! - Every card is identified by a non-empty `CardId` unique within a board.
//! - Cards reference nothing but other ids; the card list owns every card.

pub mod card;
pub mod draft;
