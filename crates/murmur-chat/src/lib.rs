//! Chat session management for Murmur.
//!
//! [`ChatSessionManager`] owns the active chat, appends the user message and
//! a pending assistant placeholder, waits on an injected
//! [`ReplyGenerator`](murmur_providers::ReplyGenerator), then either
//! finalizes and saves the chat or withdraws the placeholder.

pub mod manager;

pub use manager::{ChatSessionManager, ChatSettings, ExchangeOutcome};
