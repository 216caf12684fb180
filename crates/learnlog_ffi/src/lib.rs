//! Flutter-facing bindings for the learning-log core.

pub mod api;
