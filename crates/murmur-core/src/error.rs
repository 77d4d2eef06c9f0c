//! Storage error type.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::store::KeyValueStore) or the
/// [`ChatStore`](crate::store::ChatStore) on top of it.
///
/// The listing operations of `ChatStore` swallow these and fall back to
/// empty or default data; the `load_*` variants surface them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value under key '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// The storage key the error relates to.
    pub fn key(&self) -> &str {
        match self {
            StoreError::Io { key, .. }
            | StoreError::Corrupt { key, .. }
            | StoreError::Encode { key, .. } => key,
        }
    }

    /// Whether the error stems from malformed stored data.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}
