//! Persisted board codec.
//!
//! # Responsibility
//! - Encode the card list as the JSON array stored under one key.
//! - Decode untrusted stored text into well-formed cards.
//!
//! # Invariants
//! - Decoding never fails; malformed input degrades to defaults.
//! - Decoded ids are non-empty and unique.

pub mod cards;
