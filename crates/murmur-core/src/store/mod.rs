//! Persistence store — a key-value medium plus the typed chat store on top.
//!
//! # Layout
//!
//! - `saved_chats` → JSON array of chats, timestamps as RFC 3339 strings
//! - `prompt_templates` → JSON array of prompt templates
//!
//! Every write rewrites the whole collection under its key; deleting the
//! last chat removes `saved_chats`.

pub mod chat_store;
pub mod kv;

pub use chat_store::{ChatStore, SESSIONS_KEY, TEMPLATES_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
