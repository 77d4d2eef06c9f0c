//! Canned reply generator — a stand-in assistant that answers after a random
//! delay with one of a fixed set of replies.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use murmur_core::config::ReplyConfig;

use crate::traits::{ReplyError, ReplyGenerator};

/// Replies the stand-in assistant picks from.
pub const CANNED_REPLIES: &[&str] = &[
    "That's an interesting question! Let me think about that...",
    "I understand what you're asking. Here's my perspective on that topic.",
    "Great point! I can help you with that.",
    "Based on the information you've provided, I would suggest the following approach.",
    "I appreciate you sharing that with me. Let me provide some insights.",
    "That's a complex topic. Let me break it down for you.",
    "I see what you mean. Here's how I would approach this situation.",
    "Thanks for the question! I have some thoughts on this matter.",
];

/// Answers every message with a uniformly chosen canned reply after a
/// uniformly chosen delay. Ignores the message text.
#[derive(Clone, Debug)]
pub struct CannedReplyGenerator {
    min_delay: Duration,
    max_delay: Duration,
    replies: Vec<String>,
}

impl CannedReplyGenerator {
    /// Delay between `min_delay` and `max_delay` (inclusive), built-in replies.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            min_delay: min_delay.min(max_delay),
            max_delay: max_delay.max(min_delay),
            replies: CANNED_REPLIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn pick(&self) -> Result<(Duration, String), ReplyError> {
        let mut rng = rand::thread_rng();
        let reply = self
            .replies
            .choose(&mut rng)
            .cloned()
            .ok_or_else(|| ReplyError::Unavailable("no canned replies configured".into()))?;

        let lo = self.min_delay.as_millis() as u64;
        let hi = self.max_delay.as_millis() as u64;
        let delay = Duration::from_millis(rng.gen_range(lo..=hi));
        Ok((delay, reply))
    }
}

impl Default for CannedReplyGenerator {
    fn default() -> Self {
        let (min, max) = ReplyConfig::default().delay_range();
        Self::new(min, max)
    }
}

#[async_trait]
impl ReplyGenerator for CannedReplyGenerator {
    async fn generate(&self, _user_text: &str) -> Result<String, ReplyError> {
        // Pick before sleeping: the thread-local rng must not live across the await
        let (delay, reply) = self.pick()?;
        debug!(delay_ms = delay.as_millis() as u64, "simulating reply delay");
        tokio::time::sleep(delay).await;
        Ok(reply)
    }

    fn display_name(&self) -> &str {
        "canned"
    }
}

/// Build the reply generator described by the config.
pub fn create_generator(config: &ReplyConfig) -> CannedReplyGenerator {
    let (min, max) = config.delay_range();
    debug!(
        min_delay_ms = min.as_millis() as u64,
        max_delay_ms = max.as_millis() as u64,
        "creating canned reply generator"
    );
    CannedReplyGenerator::new(min, max)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> CannedReplyGenerator {
        CannedReplyGenerator::new(Duration::ZERO, Duration::ZERO)
    }

    fn instant_with(replies: &[&str]) -> CannedReplyGenerator {
        CannedReplyGenerator {
            replies: replies.iter().map(|s| s.to_string()).collect(),
            ..instant()
        }
    }

    #[tokio::test]
    async fn test_reply_comes_from_canned_set() {
        let generator = instant();
        for _ in 0..20 {
            let reply = generator.generate("anything").await.unwrap();
            assert!(CANNED_REPLIES.contains(&reply.as_str()));
        }
    }

    #[tokio::test]
    async fn test_custom_replies() {
        let generator = instant_with(&["only answer"]);
        assert_eq!(generator.generate("hi").await.unwrap(), "only answer");
    }

    #[tokio::test]
    async fn test_empty_reply_set_fails() {
        let generator = instant_with(&[]);
        let err = generator.generate("hi").await.unwrap_err();
        assert!(matches!(err, ReplyError::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_within_bounds() {
        let generator = CannedReplyGenerator::new(Duration::from_millis(1000), Duration::from_millis(3000));
        let started = tokio::time::Instant::now();
        generator.generate("hi").await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed <= Duration::from_millis(3100));
    }

    #[test]
    fn test_reversed_bounds_are_ordered() {
        let generator = CannedReplyGenerator::new(Duration::from_millis(50), Duration::from_millis(10));
        for _ in 0..20 {
            let (delay, _) = generator.pick().unwrap();
            assert!(delay >= Duration::from_millis(10) && delay <= Duration::from_millis(50));
        }
    }

    #[test]
    fn test_create_generator_from_config() {
        let config = ReplyConfig {
            min_delay_ms: 5,
            max_delay_ms: 7,
            timeout_secs: 0,
        };
        let generator = create_generator(&config);
        assert_eq!(generator.min_delay, Duration::from_millis(5));
        assert_eq!(generator.max_delay, Duration::from_millis(7));
        assert_eq!(generator.replies.len(), CANNED_REPLIES.len());
        assert_eq!(generator.display_name(), "canned");
    }
}
