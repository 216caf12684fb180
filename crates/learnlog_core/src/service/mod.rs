//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the in-memory stores and the persistence adapter.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod board_service;
