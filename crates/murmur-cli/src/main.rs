//! Murmur CLI — entry point.
//!
//! # Commands
//!
//! - `murmur chat [-m MESSAGE] [-s SESSION]` — chat (single-shot or REPL)
//! - `murmur sessions ...` — list, show, delete saved chats; usage stats
//! - `murmur templates ...` — list, show, fill, reset prompt templates
//! - `murmur status` — show configuration and store status

mod helpers;
mod repl;
mod sessions_cmd;
mod status;
mod templates_cmd;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use murmur_chat::{ChatSessionManager, ChatSettings, ExchangeOutcome};
use murmur_core::config::{load_config, Config};
use murmur_core::store::{ChatStore, FileStore};
use murmur_providers::create_generator;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Murmur — a local chat client
#[derive(Parser)]
#[command(name = "murmur", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Continue a saved chat by id
        #[arg(short, long)]
        session: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Manage saved chats
    Sessions {
        #[command(subcommand)]
        action: sessions_cmd::SessionsCommands,
    },

    /// Manage prompt templates
    Templates {
        #[command(subcommand)]
        action: templates_cmd::TemplatesCommands,
    },

    /// Show configuration and store status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            session,
            logs,
        } => {
            init_logging(logs);
            run_chat(message, session).await
        }
        Commands::Sessions { action } => {
            init_logging(false);
            sessions_cmd::dispatch(action)
        }
        Commands::Templates { action } => {
            init_logging(false);
            templates_cmd::dispatch(action)
        }
        Commands::Status => {
            init_logging(false);
            status::run()
        }
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>, session_id: Option<String>) -> Result<()> {
    let config = load_config(None);
    let manager = build_manager(&config)?;

    if let Some(id) = session_id.as_deref() {
        if !manager.load_session(id) {
            anyhow::bail!("no saved chat with id '{id}'");
        }
        info!(session = id, "continuing saved chat");
    }

    match message {
        Some(msg) => {
            // Single-shot mode
            match manager.send_message(&msg).await {
                ExchangeOutcome::Completed(reply) => helpers::print_response(&reply.content),
                ExchangeOutcome::Reverted(e) => anyhow::bail!("no reply: {e}"),
                ExchangeOutcome::Ignored => anyhow::bail!("message is empty"),
            }
        }
        None => {
            // Interactive REPL mode
            repl::run(manager).await?;
        }
    }

    Ok(())
}

/// Open the configured chat store.
pub fn open_store(config: &Config) -> Result<Arc<ChatStore>> {
    let dir = config.storage.resolved_dir();
    let medium = FileStore::new(Some(dir.clone()))
        .with_context(|| format!("failed to open store at {}", dir.display()))?;
    Ok(Arc::new(ChatStore::new(Arc::new(medium))))
}

/// Build a `ChatSessionManager` from the loaded configuration.
pub fn build_manager(config: &Config) -> Result<ChatSessionManager> {
    let store = open_store(config)?;
    let generator = create_generator(&config.reply);
    Ok(ChatSessionManager::new(
        store,
        Arc::new(generator),
        ChatSettings::from_config(config),
    ))
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("murmur=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
