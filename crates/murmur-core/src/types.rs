//! Core types for Murmur — messages, chats, and prompt templates.
//!
//! All types serialize with camelCase keys and RFC 3339 timestamps, which is
//! the layout kept under the `saved_chats` and `prompt_templates` store keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils;

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    /// Older stores wrote `"bot"` for assistant messages.
    #[serde(alias = "bot")]
    Assistant,
}

/// A single message in a chat.
///
/// Finalized messages are never edited. A pending assistant placeholder is
/// replaced wholesale by a finalized message that keeps its `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Set on the assistant placeholder while a reply is outstanding.
    #[serde(
        rename = "isLoading",
        alias = "pending",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub pending: bool,
}

impl Message {
    /// Create a finalized user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: utils::new_id(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            pending: false,
        }
    }

    /// Create a finalized assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: utils::new_id(),
            content: content.into(),
            sender: Sender::Assistant,
            timestamp: Utc::now(),
            pending: false,
        }
    }

    /// Create an empty assistant placeholder awaiting a reply.
    pub fn placeholder() -> Self {
        Self {
            pending: true,
            ..Self::assistant(String::new())
        }
    }

    /// The finalized counterpart of this placeholder: same id and
    /// timestamp, the given content, no longer pending.
    pub fn finalized(&self, content: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            content: content.into(),
            sender: self.sender,
            timestamp: self.timestamp,
            pending: false,
        }
    }
}

// ─────────────────────────────────────────────
// Chats
// ─────────────────────────────────────────────

/// One conversation thread: a title plus an ordered list of messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Create a new empty chat with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: utils::new_id(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a user message followed by its assistant placeholder.
    ///
    /// The first message of a chat also names it after a prefix of the user
    /// text; a chat that already has messages keeps its title.
    pub fn begin_exchange(&mut self, user: Message, placeholder: Message, title_max_chars: usize) {
        if self.messages.is_empty() {
            self.title = utils::title_from_text(&user.content, title_max_chars);
        }
        self.messages.push(user);
        self.messages.push(placeholder);
        self.updated_at = Utc::now();
    }

    /// Replace the pending placeholder `placeholder_id` with its finalized
    /// counterpart carrying `content`.
    ///
    /// Returns the finalized message, or `None` if no pending message with
    /// that id exists.
    pub fn finalize_reply(&mut self, placeholder_id: &str, content: impl Into<String>) -> Option<Message> {
        let slot = self
            .messages
            .iter_mut()
            .find(|m| m.id == placeholder_id && m.pending)?;
        let finalized = slot.finalized(content);
        *slot = finalized.clone();
        self.updated_at = Utc::now();
        Some(finalized)
    }

    /// Drop the pending placeholder `placeholder_id`. Returns whether it was found.
    pub fn discard_placeholder(&mut self, placeholder_id: &str) -> bool {
        match self
            .messages
            .iter()
            .position(|m| m.id == placeholder_id && m.pending)
        {
            Some(idx) => {
                self.messages.remove(idx);
                true
            }
            None => false,
        }
    }

    /// The outstanding assistant placeholder, if any.
    pub fn pending_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.pending)
    }
}

// ─────────────────────────────────────────────
// Prompt templates
// ─────────────────────────────────────────────

/// A reusable prompt with `[PLACEHOLDER]` markers in its content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
}

impl PromptTemplate {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
