//! `murmur sessions` — inspect and prune saved chats.
//!
//! - `murmur sessions list` — one line per saved chat
//! - `murmur sessions show <ID>` — full transcript
//! - `murmur sessions delete <ID>` — remove a chat
//! - `murmur sessions stats [--json]` — usage statistics

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use murmur_core::config::load_config;
use murmur_core::stats::ChatStats;
use murmur_core::store::ChatStore;
use murmur_core::types::Chat;

use crate::helpers;

/// Sessions subcommands.
#[derive(Subcommand)]
pub enum SessionsCommands {
    /// List saved chats, most recently updated first
    List,

    /// Print the transcript of a saved chat
    Show {
        /// Chat ID
        id: String,
    },

    /// Delete a saved chat
    Delete {
        /// Chat ID
        id: String,
    },

    /// Show usage statistics across saved chats
    Stats {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Dispatch a sessions subcommand.
pub fn dispatch(cmd: SessionsCommands) -> Result<()> {
    let config = load_config(None);
    let store = crate::open_store(&config)?;

    match cmd {
        SessionsCommands::List => list(&store),
        SessionsCommands::Show { id } => show(&store, &id),
        SessionsCommands::Delete { id } => delete(&store, &id),
        SessionsCommands::Stats { json } => stats(&store, json),
    }
}

fn list(store: &ChatStore) -> Result<()> {
    let chats = sorted_by_recency(store.list_sessions());
    if chats.is_empty() {
        println!("{}", "No saved chats.".dimmed());
        return Ok(());
    }
    for chat in &chats {
        println!("{}", helpers::format_chat_line(chat));
    }
    Ok(())
}

fn show(store: &ChatStore, id: &str) -> Result<()> {
    let chat = store
        .find_session(id)
        .with_context(|| format!("no saved chat with id '{id}'"))?;
    helpers::print_transcript(&chat);
    Ok(())
}

fn delete(store: &ChatStore, id: &str) -> Result<()> {
    if store.delete_session(id).context("failed to delete chat")? {
        println!("{} {}", "Deleted".green(), id);
    } else {
        println!("{} {}", "No saved chat with id".yellow(), id);
    }
    Ok(())
}

fn stats(store: &ChatStore, json: bool) -> Result<()> {
    let stats = ChatStats::from_chats(&store.list_sessions());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("  {:<22} {}", "Chats:".bold(), stats.total_chats);
    println!("  {:<22} {}", "Messages:".bold(), stats.total_messages);
    println!(
        "  {:<22} {:.1}",
        "Messages per chat:".bold(),
        stats.average_messages_per_chat
    );
    println!(
        "  {:<22} {}",
        "Most active day:".bold(),
        if stats.most_active_day.is_empty() {
            "—".to_string()
        } else {
            stats.most_active_day.clone()
        }
    );
    println!("  {:<22} {:.1}s", "Avg. response time:".bold(), stats.response_time);
    println!();
    Ok(())
}

fn sorted_by_recency(mut chats: Vec<Chat>) -> Vec<Chat> {
    chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    chats
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
