//! Flutter-facing bindings over `moodlog_core`.

pub mod api;
