//! Usage statistics over stored chats.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Chat, Sender};

/// Aggregate numbers shown by `murmur sessions stats`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStats {
    pub total_chats: usize,
    pub total_messages: usize,
    pub average_messages_per_chat: f64,
    /// UTC date (`YYYY-MM-DD`) with the most messages; empty without messages.
    pub most_active_day: String,
    /// Mean seconds between a user message and the reply that follows it.
    pub response_time: f64,
}

impl ChatStats {
    pub fn from_chats(chats: &[Chat]) -> Self {
        let total_chats = chats.len();
        let total_messages: usize = chats.iter().map(|c| c.messages.len()).sum();
        let average_messages_per_chat = if total_chats == 0 {
            0.0
        } else {
            total_messages as f64 / total_chats as f64
        };

        // BTreeMap iterates dates in order, so ties resolve to the earliest day
        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for msg in chats.iter().flat_map(|c| &c.messages) {
            *per_day.entry(msg.timestamp.date_naive()).or_default() += 1;
        }
        let most_active_day = per_day
            .iter()
            .fold(None::<(&NaiveDate, usize)>, |best, (day, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((day, count)),
            })
            .map(|(day, _)| day.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let mut gaps = Vec::new();
        for chat in chats {
            for pair in chat.messages.windows(2) {
                let (asked, answered) = (&pair[0], &pair[1]);
                if asked.sender == Sender::User && answered.sender == Sender::Assistant && !answered.pending {
                    let ms = (answered.timestamp - asked.timestamp).num_milliseconds().max(0);
                    gaps.push(ms as f64 / 1000.0);
                }
            }
        }
        let response_time = if gaps.is_empty() {
            0.0
        } else {
            gaps.iter().sum::<f64>() / gaps.len() as f64
        };

        Self {
            total_chats,
            total_messages,
            average_messages_per_chat,
            most_active_day,
            response_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use chrono::{DateTime, Duration, Utc};

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn exchange(chat: &mut Chat, asked: DateTime<Utc>, delay_secs: i64) {
        let mut user = Message::user("q");
        user.timestamp = asked;
        let mut reply = Message::assistant("a");
        reply.timestamp = asked + Duration::seconds(delay_secs);
        chat.messages.push(user);
        chat.messages.push(reply);
    }

    #[test]
    fn test_empty() {
        let stats = ChatStats::from_chats(&[]);
        assert_eq!(stats, ChatStats::default());
    }

    #[test]
    fn test_totals_and_average() {
        let mut a = Chat::new("a");
        exchange(&mut a, at("2024-05-01T10:00:00Z"), 2);
        exchange(&mut a, at("2024-05-01T11:00:00Z"), 4);
        let mut b = Chat::new("b");
        exchange(&mut b, at("2024-05-02T09:00:00Z"), 3);

        let stats = ChatStats::from_chats(&[a, b]);
        assert_eq!(stats.total_chats, 2);
        assert_eq!(stats.total_messages, 6);
        assert!((stats.average_messages_per_chat - 3.0).abs() < f64::EPSILON);
        assert_eq!(stats.most_active_day, "2024-05-01");
        assert!((stats.response_time - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_most_active_day_tie_prefers_earliest() {
        let mut chat = Chat::new("a");
        exchange(&mut chat, at("2024-05-03T10:00:00Z"), 1);
        exchange(&mut chat, at("2024-05-02T10:00:00Z"), 1);
        let stats = ChatStats::from_chats(&[chat]);
        assert_eq!(stats.most_active_day, "2024-05-02");
    }

    #[test]
    fn test_pending_and_unanswered_messages_excluded_from_response_time() {
        let mut chat = Chat::new("a");
        chat.messages.push(Message::user("no reply yet"));
        chat.messages.push(Message::placeholder());
        let stats = ChatStats::from_chats(&[chat]);
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.response_time, 0.0);
    }
}
