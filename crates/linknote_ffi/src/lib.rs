//! Flutter-facing bindings for LinkNote core.

pub mod api;
