//! Shared helpers for content loading and output.

pub mod date;
pub mod mime;
pub mod path;
pub mod slug;
