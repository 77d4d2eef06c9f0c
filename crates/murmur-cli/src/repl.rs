//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history.

use anyhow::Result;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use murmur_chat::{ChatSessionManager, ExchangeOutcome};
use murmur_core::templates::parse_assignments;

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

const HELP: &str = "\
  /new               start a new chat
  /load <id>         continue a saved chat
  /sessions          list saved chats
  /delete <id>       delete a saved chat
  /show              print the current chat
  /templates         list prompt templates
  /use <id> [K=V..]  send a prompt template with placeholders filled
                     (values may span words: topic=rust ownership)
  /help              this help
  exit               quit";

/// A parsed line of REPL input.
#[derive(Debug, PartialEq)]
enum ReplCommand<'a> {
    Exit,
    Help,
    New,
    Load(&'a str),
    Sessions,
    Delete(&'a str),
    Show,
    Templates,
    Use { id: &'a str, args: Vec<&'a str> },
    Unknown(&'a str),
    Message(&'a str),
}

fn parse_command(input: &str) -> ReplCommand<'_> {
    if is_exit_command(input) {
        return ReplCommand::Exit;
    }
    if !input.starts_with('/') {
        return ReplCommand::Message(input);
    }

    let mut parts = input.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("/help", _) => ReplCommand::Help,
        ("/new", _) => ReplCommand::New,
        ("/sessions", _) => ReplCommand::Sessions,
        ("/show", _) => ReplCommand::Show,
        ("/templates", _) => ReplCommand::Templates,
        ("/load", Some(id)) => ReplCommand::Load(id),
        ("/delete", Some(id)) => ReplCommand::Delete(id),
        ("/use", Some(id)) => ReplCommand::Use {
            id,
            args: parts.collect(),
        },
        _ => ReplCommand::Unknown(input),
    }
}

/// Run the interactive REPL loop.
pub async fn run(manager: ChatSessionManager) -> Result<()> {
    helpers::print_banner(manager.current_session().as_ref());

    let mut editor = create_editor()?;

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => break,
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&input);

        match parse_command(trimmed) {
            ReplCommand::Exit => {
                println!("\nGoodbye!");
                break;
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::New => {
                let chat = manager.create_session();
                println!("{} {}", "New chat".green(), chat.id.dimmed());
            }
            ReplCommand::Load(id) => {
                if manager.load_session(id) {
                    if let Some(chat) = manager.current_session() {
                        helpers::print_transcript(&chat);
                    }
                } else {
                    eprintln!("No saved chat with id {id}");
                }
            }
            ReplCommand::Sessions => {
                let chats = manager.store().list_sessions();
                if chats.is_empty() {
                    println!("{}", "No saved chats.".dimmed());
                }
                for chat in &chats {
                    println!("  {}", helpers::format_chat_line(chat));
                }
            }
            ReplCommand::Delete(id) => match manager.delete_session(id) {
                Ok(true) => println!("Deleted {id}"),
                Ok(false) => eprintln!("No saved chat with id {id}"),
                Err(e) => eprintln!("Delete failed: {e}"),
            },
            ReplCommand::Show => match manager.current_session() {
                Some(chat) => helpers::print_transcript(&chat),
                None => println!("{}", "No active chat.".dimmed()),
            },
            ReplCommand::Templates => {
                for t in manager.store().list_prompt_templates() {
                    println!("  {:>3}  {:<18} {}", t.id, t.title, t.category.dimmed());
                }
            }
            ReplCommand::Use { id, args } => match manager.store().find_prompt_template(id) {
                Some(template) => {
                    let prompt = template.fill(&parse_assignments(&args));
                    println!("{} {}", "You:".dimmed(), prompt);
                    exchange(&manager, &prompt).await;
                }
                None => eprintln!("No prompt template with id {id}"),
            },
            ReplCommand::Unknown(cmd) => eprintln!("Unknown command {cmd}; try /help"),
            ReplCommand::Message(text) => exchange(&manager, text).await,
        }
    }

    save_history(&mut editor);

    Ok(())
}

/// Send one message and print the reply.
async fn exchange(manager: &ChatSessionManager, text: &str) {
    debug!(input = text, "sending message");
    helpers::print_thinking();
    let outcome = manager.send_message(text).await;
    helpers::clear_thinking();

    match outcome {
        ExchangeOutcome::Completed(reply) => helpers::print_response(&reply.content),
        ExchangeOutcome::Reverted(e) => eprintln!("\nNo reply: {e}\n"),
        ExchangeOutcome::Ignored => {}
    }
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    murmur_core::utils::get_data_path()
        .join("history")
        .join("cli_history")
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command("/quit"));
        assert!(is_exit_command(":q"));
        assert!(!is_exit_command("hello"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn parse_plain_message() {
        assert_eq!(parse_command("hello there"), ReplCommand::Message("hello there"));
    }

    #[test]
    fn parse_commands_with_arguments() {
        assert_eq!(parse_command("/load abc"), ReplCommand::Load("abc"));
        assert_eq!(parse_command("/delete abc"), ReplCommand::Delete("abc"));
        assert_eq!(
            parse_command("/use 4 topic=crabs style=noir"),
            ReplCommand::Use {
                id: "4",
                args: vec!["topic=crabs", "style=noir"]
            }
        );
        assert_eq!(parse_command("/new"), ReplCommand::New);
        assert_eq!(parse_command("/exit"), ReplCommand::Exit);
    }

    #[test]
    fn use_values_may_contain_spaces() {
        let ReplCommand::Use { id, args } = parse_command("/use 4 topic=rust ownership style=film noir") else {
            panic!("expected /use");
        };
        assert_eq!(id, "4");
        let values = parse_assignments(&args);
        assert_eq!(values["TOPIC"], "rust ownership");
        assert_eq!(values["STYLE"], "film noir");
    }

    #[test]
    fn parse_missing_argument_is_unknown() {
        assert_eq!(parse_command("/load"), ReplCommand::Unknown("/load"));
        assert_eq!(parse_command("/frobnicate"), ReplCommand::Unknown("/frobnicate"));
    }

    #[test]
    fn history_path_under_data_dir() {
        let path = history_path();
        assert!(path.to_string_lossy().contains(".murmur"));
        assert!(path.to_string_lossy().contains("cli_history"));
    }
}
