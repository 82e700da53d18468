//! Conversation message types.
//!
//! A conversation is an ordered list of [`Message`]s. Callers resupply the
//! full history on every call; nothing here is retained between calls.

mod types;

pub use types::*;
