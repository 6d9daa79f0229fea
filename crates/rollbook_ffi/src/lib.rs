//! Flutter-facing bindings for the Rollbook core.

pub mod api;
