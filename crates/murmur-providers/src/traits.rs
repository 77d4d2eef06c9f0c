//! Reply generator trait — the seam where an assistant backend plugs in.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Why a reply could not be produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplyError {
    /// The backend could not answer.
    #[error("reply generator unavailable: {0}")]
    Unavailable(String),

    /// No answer arrived within the allowed time.
    #[error("reply timed out after {0:?}")]
    Timeout(Duration),
}

/// Produces the assistant's reply to a user message.
///
/// Callers must treat every call as an opaque asynchronous operation that
/// can fail.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate a reply to `user_text`.
    async fn generate(&self, user_text: &str) -> Result<String, ReplyError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
