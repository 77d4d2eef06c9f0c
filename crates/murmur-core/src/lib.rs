//! Core building blocks for Murmur.
//!
//! - [`types`] — chats, messages, prompt templates
//! - [`store`] — key-value medium and the chat store on top of it
//! - [`templates`] — built-in prompt templates and placeholder filling
//! - [`stats`] — usage statistics derived from stored chats
//! - [`config`] — `~/.murmur/config.json` schema, loading, env overrides
//! - [`capabilities`] — input capability port for front-ends

pub mod capabilities;
pub mod config;
pub mod error;
pub mod stats;
pub mod store;
pub mod templates;
pub mod types;
pub mod utils;

pub use error::StoreError;
pub use types::{Chat, Message, PromptTemplate, Sender};
