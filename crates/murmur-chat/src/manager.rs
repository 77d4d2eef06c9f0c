//! Chat session manager — owns the active chat and drives each
//! request/reply exchange.
//!
//! # Exchange lifecycle
//!
//! ```text
//! idle → user message + pending placeholder appended → awaiting reply
//!      → finalized (placeholder replaced, chat saved)
//!      | reverted  (placeholder removed, nothing saved)
//!      → idle
//! ```
//!
//! Only one exchange runs at a time: `send_message` while a reply is
//! outstanding is ignored. Every transition is published to subscribers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use murmur_core::config::Config;
use murmur_core::store::ChatStore;
use murmur_core::types::{Chat, Message};
use murmur_core::StoreError;
use murmur_providers::{ReplyError, ReplyGenerator};

// ─────────────────────────────────────────────
// Settings & outcome
// ─────────────────────────────────────────────

/// Knobs for session naming and reply waiting.
#[derive(Clone, Debug)]
pub struct ChatSettings {
    /// Title of a chat before its first message.
    pub default_title: String,
    /// Characters of the first message kept in the derived title.
    pub title_max_chars: usize,
    /// Give up on a reply after this long. `None` waits forever.
    pub reply_timeout: Option<Duration>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ChatSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_title: config.chat.default_title.clone(),
            title_max_chars: config.chat.title_max_chars,
            reply_timeout: config.reply.timeout(),
        }
    }
}

/// How a `send_message` call ended.
#[derive(Clone, Debug, PartialEq)]
pub enum ExchangeOutcome {
    /// Empty input, or another exchange was still in flight. Nothing changed.
    Ignored,
    /// The placeholder was replaced by this reply and the chat was saved.
    Completed(Message),
    /// The reply failed; the placeholder was withdrawn and nothing was saved.
    Reverted(ReplyError),
}

/// Ends an exchange however it ends. If the caller drops `send_message`
/// before the reply settles, the placeholder is withdrawn from the active
/// chat so it never outlives its request.
struct ExchangeGuard<'a> {
    manager: &'a ChatSessionManager,
    /// `(chat id, placeholder id)` while the reply is outstanding.
    unsettled: Option<(String, String)>,
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        if let Some((chat_id, placeholder_id)) = self.unsettled.take() {
            self.manager.abandon_exchange(&chat_id, &placeholder_id);
        }
        self.manager.awaiting.store(false, Ordering::Release);
    }
}

// ─────────────────────────────────────────────
// ChatSessionManager
// ─────────────────────────────────────────────

/// Holds the active chat and mediates between the front-end, the reply
/// generator, and the store.
pub struct ChatSessionManager {
    store: Arc<ChatStore>,
    generator: Arc<dyn ReplyGenerator>,
    settings: ChatSettings,
    /// The active chat, if any.
    current: Mutex<Option<Chat>>,
    /// Set while a reply is outstanding.
    awaiting: AtomicBool,
    /// Snapshot of `current` after every transition.
    updates: watch::Sender<Option<Chat>>,
}

impl ChatSessionManager {
    /// Create a manager with no active chat.
    pub fn new(store: Arc<ChatStore>, generator: Arc<dyn ReplyGenerator>, settings: ChatSettings) -> Self {
        let (updates, _) = watch::channel(None);
        Self {
            store,
            generator,
            settings,
            current: Mutex::new(None),
            awaiting: AtomicBool::new(false),
            updates,
        }
    }

    /// Start a new empty chat and make it active, dropping the reference to
    /// any previously active chat.
    pub fn create_session(&self) -> Chat {
        let chat = Chat::new(self.settings.default_title.clone());
        info!(chat = %chat.id, "created chat");
        self.replace_current(Some(chat.clone()));
        chat
    }

    /// Make the stored chat `id` active. Returns `false` (active chat
    /// unchanged) if no such chat is stored.
    pub fn load_session(&self, id: &str) -> bool {
        match self.store.find_session(id) {
            Some(chat) => {
                debug!(chat = %chat.id, messages = chat.messages.len(), "loaded chat");
                self.replace_current(Some(chat));
                true
            }
            None => {
                debug!(chat = id, "no stored chat with that id");
                false
            }
        }
    }

    /// Delete the stored chat `id`, clearing it from the active slot if it
    /// was active. Returns whether it was stored.
    pub fn delete_session(&self, id: &str) -> Result<bool, StoreError> {
        let existed = self.store.delete_session(id)?;
        let mut current = self.lock_current();
        if current.as_ref().is_some_and(|c| c.id == id) {
            *current = None;
            self.updates.send_replace(None);
        }
        Ok(existed)
    }

    /// Send a user message and wait for the assistant's reply.
    ///
    /// Whitespace-only text, or a call while another reply is outstanding,
    /// is ignored. Reply failures are logged and reported in the outcome,
    /// never raised.
    pub async fn send_message(&self, text: &str) -> ExchangeOutcome {
        if text.trim().is_empty() {
            debug!("ignoring empty message");
            return ExchangeOutcome::Ignored;
        }
        if self
            .awaiting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("ignoring message while a reply is outstanding");
            return ExchangeOutcome::Ignored;
        }
        let mut guard = ExchangeGuard {
            manager: self,
            unsettled: None,
        };

        let placeholder = Message::placeholder();
        let placeholder_id = placeholder.id.clone();
        let mut chat = self.begin_exchange(Message::user(text), placeholder);
        guard.unsettled = Some((chat.id.clone(), placeholder_id.clone()));

        debug!(
            chat = %chat.id,
            generator = self.generator.display_name(),
            "awaiting reply"
        );

        let reply = self.request_reply(text).await;
        guard.unsettled = None;

        match reply {
            Ok(reply) => {
                let Some(message) = chat.finalize_reply(&placeholder_id, reply) else {
                    warn!(chat = %chat.id, "placeholder missing when reply arrived");
                    return ExchangeOutcome::Ignored;
                };
                if let Err(e) = self.store.save_session(&chat) {
                    error!(chat = %chat.id, error = %e, "failed to save chat");
                }
                info!(chat = %chat.id, messages = chat.messages.len(), "reply received");
                self.reconcile(chat);
                ExchangeOutcome::Completed(message)
            }
            Err(e) => {
                warn!(chat = %chat.id, error = %e, "reply failed, withdrawing placeholder");
                chat.discard_placeholder(&placeholder_id);
                self.reconcile(chat);
                ExchangeOutcome::Reverted(e)
            }
        }
    }

    /// Snapshot of the active chat.
    pub fn current_session(&self) -> Option<Chat> {
        self.lock_current().clone()
    }

    /// Whether a reply is outstanding.
    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting.load(Ordering::Acquire)
    }

    /// Receive a snapshot of the active chat after every transition.
    pub fn subscribe(&self) -> watch::Receiver<Option<Chat>> {
        self.updates.subscribe()
    }

    /// The store this manager persists to.
    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    // ─────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────

    /// Append the user message and placeholder to the active chat (creating
    /// one if needed) and return a copy to finish the exchange on.
    fn begin_exchange(&self, user: Message, placeholder: Message) -> Chat {
        let mut current = self.lock_current();
        let chat = current.get_or_insert_with(|| {
            let chat = Chat::new(self.settings.default_title.clone());
            info!(chat = %chat.id, "created chat for first message");
            chat
        });
        chat.begin_exchange(user, placeholder, self.settings.title_max_chars);
        let snapshot = chat.clone();
        self.updates.send_replace(Some(snapshot.clone()));
        snapshot
    }

    async fn request_reply(&self, text: &str) -> Result<String, ReplyError> {
        let reply = self.generator.generate(text);
        match self.settings.reply_timeout {
            Some(limit) => tokio::time::timeout(limit, reply)
                .await
                .unwrap_or(Err(ReplyError::Timeout(limit))),
            None => reply.await,
        }
    }

    /// Put the finished exchange back into the active slot, unless the
    /// front-end switched to another chat meanwhile.
    fn reconcile(&self, chat: Chat) {
        let mut current = self.lock_current();
        match current.as_mut() {
            Some(active) if active.id == chat.id => {
                *active = chat;
                self.updates.send_replace(current.clone());
            }
            _ => debug!(chat = %chat.id, "active chat changed during exchange"),
        }
    }

    /// Withdraw the placeholder of an exchange whose caller stopped waiting.
    fn abandon_exchange(&self, chat_id: &str, placeholder_id: &str) {
        let mut current = self.lock_current();
        let withdrawn = match current.as_mut() {
            Some(active) if active.id == chat_id => active.discard_placeholder(placeholder_id),
            _ => false,
        };
        if withdrawn {
            warn!(chat = chat_id, "exchange abandoned before reply, withdrawing placeholder");
            self.updates.send_replace(current.clone());
        }
    }

    fn replace_current(&self, chat: Option<Chat>) {
        let mut current = self.lock_current();
        *current = chat;
        self.updates.send_replace(current.clone());
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Chat>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
