//! Typed access to stored chats and prompt templates.
//!
//! The `load_*` methods surface [`StoreError`]; the `list_*` methods never
//! fail and treat missing or malformed data as absent.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::kv::KeyValueStore;
use crate::templates::default_templates;
use crate::types::{Chat, PromptTemplate};

/// Key holding the JSON array of saved chats.
pub const SESSIONS_KEY: &str = "saved_chats";

/// Key holding the JSON array of prompt templates.
pub const TEMPLATES_KEY: &str = "prompt_templates";

/// Chat and prompt-template persistence over a [`KeyValueStore`].
pub struct ChatStore {
    medium: Arc<dyn KeyValueStore>,
}

impl ChatStore {
    pub fn new(medium: Arc<dyn KeyValueStore>) -> Self {
        Self { medium }
    }

    // ─────────────────────────────────────────
    // Chats
    // ─────────────────────────────────────────

    /// Read all stored chats. `Ok(vec![])` if nothing is stored.
    pub fn load_sessions(&self) -> Result<Vec<Chat>, StoreError> {
        Ok(self.read_json(SESSIONS_KEY)?.unwrap_or_default())
    }

    /// All stored chats; empty if storage is absent or corrupt.
    pub fn list_sessions(&self) -> Vec<Chat> {
        self.load_sessions().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable saved chats");
            Vec::new()
        })
    }

    /// Look up a stored chat by id.
    pub fn find_session(&self, id: &str) -> Option<Chat> {
        self.list_sessions().into_iter().find(|c| c.id == id)
    }

    /// Insert or replace a chat by id, rewriting the whole collection.
    pub fn save_session(&self, chat: &Chat) -> Result<(), StoreError> {
        let mut chats = self.list_sessions();
        match chats.iter_mut().find(|c| c.id == chat.id) {
            Some(existing) => *existing = chat.clone(),
            None => chats.push(chat.clone()),
        }
        self.write_json(SESSIONS_KEY, &chats)?;
        debug!(id = %chat.id, messages = chat.messages.len(), total = chats.len(), "saved chat");
        Ok(())
    }

    /// Remove a chat by id. Returns whether it existed. Deleting the last
    /// chat removes the collection key.
    pub fn delete_session(&self, id: &str) -> Result<bool, StoreError> {
        let mut chats = self.list_sessions();
        let before = chats.len();
        chats.retain(|c| c.id != id);
        if chats.is_empty() {
            self.medium.remove(SESSIONS_KEY)?;
        } else {
            self.write_json(SESSIONS_KEY, &chats)?;
        }

        let existed = chats.len() != before;
        if existed {
            info!(id, "deleted chat");
        }
        Ok(existed)
    }

    // ─────────────────────────────────────────
    // Prompt templates
    // ─────────────────────────────────────────

    /// Read stored templates, `Ok(None)` if nothing is stored.
    pub fn load_prompt_templates(&self) -> Result<Option<Vec<PromptTemplate>>, StoreError> {
        self.read_json(TEMPLATES_KEY)
    }

    /// Stored templates, or the built-in set.
    ///
    /// An empty store is seeded with the built-in set. Corrupt data is
    /// answered with the built-in set but left in place.
    pub fn list_prompt_templates(&self) -> Vec<PromptTemplate> {
        match self.load_prompt_templates() {
            Ok(Some(templates)) => templates,
            Ok(None) => {
                let defaults = default_templates();
                if let Err(e) = self.save_prompt_templates(&defaults) {
                    warn!(error = %e, "failed to seed default prompt templates");
                }
                defaults
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable prompt templates");
                default_templates()
            }
        }
    }

    /// Look up a template by id.
    pub fn find_prompt_template(&self, id: &str) -> Option<PromptTemplate> {
        self.list_prompt_templates().into_iter().find(|t| t.id == id)
    }

    /// Replace the stored template collection.
    pub fn save_prompt_templates(&self, templates: &[PromptTemplate]) -> Result<(), StoreError> {
        self.write_json(TEMPLATES_KEY, templates)
    }

    // ─────────────────────────────────────────
    // Encoding
    // ─────────────────────────────────────────

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.medium.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.medium.set(key, &json)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::kv::{FileStore, MemoryStore};
    use crate::types::Message;
    use tempfile::tempdir;

    fn make_store() -> (ChatStore, Arc<MemoryStore>) {
        let medium = Arc::new(MemoryStore::new());
        (ChatStore::new(medium.clone()), medium)
    }

    fn sample_chat(title: &str) -> Chat {
        let mut chat = Chat::new("New Chat");
        let placeholder = Message::placeholder();
        let id = placeholder.id.clone();
        chat.begin_exchange(Message::user(title), placeholder, 30);
        chat.finalize_reply(&id, "Great point! I can help you with that.");
        chat
    }

    #[test]
    fn test_list_sessions_empty_store() {
        let (store, _) = make_store();
        assert!(store.list_sessions().is_empty());
        assert!(store.load_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_list_round_trip() {
        let (store, _) = make_store();
        let chat = sample_chat("Hello there");
        store.save_session(&chat).unwrap();

        let listed = store.list_sessions();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], chat);
    }

    #[test]
    fn test_save_is_upsert() {
        let (store, _) = make_store();
        let mut chat = sample_chat("first");
        store.save_session(&chat).unwrap();

        chat.title = "Renamed".to_string();
        chat.messages.push(Message::user("again"));
        store.save_session(&chat).unwrap();
        store.save_session(&sample_chat("other")).unwrap();

        let listed = store.list_sessions();
        assert_eq!(listed.len(), 2);
        // Upsert keeps the original position
        assert_eq!(listed[0].id, chat.id);
        assert_eq!(listed[0].title, "Renamed");
        assert_eq!(listed[0].messages.len(), 3);
    }

    #[test]
    fn test_corrupt_sessions_are_swallowed() {
        let (store, medium) = make_store();
        medium.set(SESSIONS_KEY, "not json [[[").unwrap();

        assert!(store.list_sessions().is_empty());
        let err = store.load_sessions().unwrap_err();
        assert!(err.is_corrupt());
        assert_eq!(err.key(), SESSIONS_KEY);
    }

    #[test]
    fn test_reads_legacy_layout() {
        let (store, medium) = make_store();
        medium
            .set(
                SESSIONS_KEY,
                r#"[{
                    "id": "1715000000000",
                    "title": "Hi...",
                    "createdAt": "2024-05-06T12:00:00.000Z",
                    "updatedAt": "2024-05-06T12:00:03.000Z",
                    "messages": [
                        {"id": "1715000000000", "content": "Hi", "sender": "user", "timestamp": "2024-05-06T12:00:00.000Z"},
                        {"id": "1715000000001", "content": "Great point!", "sender": "bot", "timestamp": "2024-05-06T12:00:00.000Z", "isLoading": false}
                    ]
                }]"#,
            )
            .unwrap();

        let chat = store.find_session("1715000000000").unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[1].sender, crate::types::Sender::Assistant);
        assert_eq!((chat.updated_at - chat.created_at).num_seconds(), 3);
    }

    #[test]
    fn test_delete_session() {
        let (store, _) = make_store();
        let a = sample_chat("a");
        let b = sample_chat("b");
        store.save_session(&a).unwrap();
        store.save_session(&b).unwrap();

        assert!(store.delete_session(&a.id).unwrap());
        assert!(!store.delete_session(&a.id).unwrap());

        let listed = store.list_sessions();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, b.id);
    }

    #[test]
    fn test_delete_last_session_removes_key() {
        let (store, medium) = make_store();
        let chat = sample_chat("only");
        store.save_session(&chat).unwrap();
        assert!(medium.get(SESSIONS_KEY).unwrap().is_some());

        assert!(store.delete_session(&chat.id).unwrap());
        assert!(medium.get(SESSIONS_KEY).unwrap().is_none());
        assert!(store.load_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_find_session_missing() {
        let (store, _) = make_store();
        store.save_session(&sample_chat("a")).unwrap();
        assert!(store.find_session("missing").is_none());
    }

    #[test]
    fn test_templates_seeded_on_first_access() {
        let (store, medium) = make_store();
        assert!(medium.get(TEMPLATES_KEY).unwrap().is_none());

        let templates = store.list_prompt_templates();
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[0].id, "1");
        assert_eq!(templates[4].category, "General");

        // Defaults were persisted
        let stored = store.load_prompt_templates().unwrap().unwrap();
        assert_eq!(stored, templates);
    }

    #[test]
    fn test_corrupt_templates_return_defaults_without_overwrite() {
        let (store, medium) = make_store();
        medium.set(TEMPLATES_KEY, "{broken").unwrap();

        let templates = store.list_prompt_templates();
        assert_eq!(templates.len(), 5);
        assert_eq!(medium.get(TEMPLATES_KEY).unwrap().as_deref(), Some("{broken"));
    }

    #[test]
    fn test_save_custom_templates() {
        let (store, _) = make_store();
        let custom = vec![PromptTemplate::new("9", "Haiku", "Write a haiku about [TOPIC].", "Creative")];
        store.save_prompt_templates(&custom).unwrap();

        assert_eq!(store.list_prompt_templates(), custom);
        assert_eq!(store.find_prompt_template("9").unwrap().title, "Haiku");
        assert!(store.find_prompt_template("1").is_none());
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = tempdir().unwrap();
        let chat = sample_chat("persist me");
        {
            let medium = Arc::new(FileStore::new(Some(dir.path().to_path_buf())).unwrap());
            ChatStore::new(medium).save_session(&chat).unwrap();
        }

        let medium = Arc::new(FileStore::new(Some(dir.path().to_path_buf())).unwrap());
        let store = ChatStore::new(medium);
        assert_eq!(store.find_session(&chat.id), Some(chat));
    }
}
