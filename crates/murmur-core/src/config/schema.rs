//! Configuration schema.
//!
//! Hierarchy: `Config` → `StorageConfig`, `ReplyConfig`, `ChatConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.murmur/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub storage: StorageConfig,
    pub reply: ReplyConfig,
    pub chat: ChatConfig,
}

// ─────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────

/// Where the key-value store lives.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Store directory; `~` is expanded.
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.murmur/store".to_string(),
        }
    }
}

impl StorageConfig {
    /// The store directory with `~` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        utils::expand_home(&self.data_dir)
    }
}

// ─────────────────────────────────────────────
// Reply generation
// ─────────────────────────────────────────────

/// Canned reply generator timing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplyConfig {
    /// Lower bound of the simulated reply delay.
    pub min_delay_ms: u64,
    /// Upper bound of the simulated reply delay.
    pub max_delay_ms: u64,
    /// Give up on a reply after this many seconds. `0` waits forever.
    pub timeout_secs: u64,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            timeout_secs: 60,
        }
    }
}

impl ReplyConfig {
    /// Delay bounds, swapped into order if configured backwards.
    pub fn delay_range(&self) -> (Duration, Duration) {
        let lo = self.min_delay_ms.min(self.max_delay_ms);
        let hi = self.min_delay_ms.max(self.max_delay_ms);
        (Duration::from_millis(lo), Duration::from_millis(hi))
    }

    /// The reply timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

// ─────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────

/// Session naming.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatConfig {
    /// Title of a chat before its first message.
    pub default_title: String,
    /// Characters of the first message kept in the derived title.
    pub title_max_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_title: "New Chat".to_string(),
            title_max_chars: 30,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
