//! Shared CLI helpers — response printing, banners, chat formatting.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use murmur_core::types::{Chat, Message, Sender};
use murmur_core::utils::truncate_string;

/// Print an assistant reply to stdout.
pub fn print_response(response: &str) {
    println!();
    println!("{}", "Murmur".cyan().bold());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner(chat: Option<&Chat>) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "Murmur".cyan().bold(), version.dimmed());
    if let Some(chat) = chat {
        println!("{} {}", "Continuing:".dimmed(), chat.title);
    }
    println!(
        "{}",
        "Type a message, /help for commands, or \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder while a reply is pending.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// Print every message of a chat.
pub fn print_transcript(chat: &Chat) {
    println!();
    println!("{}  {}", chat.title.bold(), chat.id.dimmed());
    for msg in &chat.messages {
        print_message(msg);
    }
    println!();
}

fn print_message(msg: &Message) {
    let who = match msg.sender {
        Sender::User => "You".green().bold(),
        Sender::Assistant => "Murmur".cyan().bold(),
    };
    let body = if msg.pending {
        "…".dimmed().to_string()
    } else {
        msg.content.clone()
    };
    println!("{} {} {}", format_time(&msg.timestamp).dimmed(), who, body);
}

/// One-line summary of a saved chat for listings.
pub fn format_chat_line(chat: &Chat) -> String {
    format!(
        "{:<36}  {:<36}  {:>3} msgs  {}",
        chat.id,
        truncate_string(&chat.title, 36),
        chat.messages.len(),
        format_time(&chat.updated_at)
    )
}

/// Local `YYYY-MM-DD HH:MM` rendering of a timestamp.
pub fn format_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_chat_line_includes_id_and_count() {
        let mut chat = Chat::new("Trip planning...");
        chat.messages.push(Message::user("where to?"));
        let line = format_chat_line(&chat);
        assert!(line.starts_with(&chat.id));
        assert!(line.contains("Trip planning..."));
        assert!(line.contains("1 msgs"));
    }

    #[test]
    fn format_chat_line_truncates_long_titles() {
        let chat = Chat::new("a".repeat(80));
        let line = format_chat_line(&chat);
        assert!(line.contains(&format!("{}...", "a".repeat(33))));
        assert!(!line.contains(&"a".repeat(40)));
    }

    #[test]
    fn format_time_shape() {
        let formatted = format_time(&Utc::now());
        assert_eq!(formatted.len(), 16);
        assert_eq!(formatted.chars().nth(4), Some('-'));
        assert_eq!(formatted.chars().nth(13), Some(':'));
    }
}
