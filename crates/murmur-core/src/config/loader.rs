//! Config loader — reads `~/.murmur/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.murmur/config.json`
//! 3. Environment variables `MURMUR_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `MURMUR_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `MURMUR_STORAGE__DATA_DIR` → `storage.data_dir`
/// - `MURMUR_REPLY__MIN_DELAY_MS` → `reply.min_delay_ms`
/// - `MURMUR_REPLY__MAX_DELAY_MS` → `reply.max_delay_ms`
/// - `MURMUR_REPLY__TIMEOUT_SECS` → `reply.timeout_secs`
/// - `MURMUR_CHAT__DEFAULT_TITLE` → `chat.default_title`
/// - `MURMUR_CHAT__TITLE_MAX_CHARS` → `chat.title_max_chars`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("MURMUR_STORAGE__DATA_DIR") {
        config.storage.data_dir = val;
    }

    if let Some(n) = env_parse::<u64>("MURMUR_REPLY__MIN_DELAY_MS") {
        config.reply.min_delay_ms = n;
    }
    if let Some(n) = env_parse::<u64>("MURMUR_REPLY__MAX_DELAY_MS") {
        config.reply.max_delay_ms = n;
    }
    if let Some(n) = env_parse::<u64>("MURMUR_REPLY__TIMEOUT_SECS") {
        config.reply.timeout_secs = n;
    }

    if let Ok(val) = std::env::var("MURMUR_CHAT__DEFAULT_TITLE") {
        config.chat.default_title = val;
    }
    if let Some(n) = env_parse::<usize>("MURMUR_CHAT__TITLE_MAX_CHARS") {
        config.chat.title_max_chars = n;
    }

    config
}

/// Read and parse an env var, ignoring (with a warning) values that don't parse.
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", name, raw);
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
