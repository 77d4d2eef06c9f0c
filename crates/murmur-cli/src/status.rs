//! `murmur status` — show configuration, store, and input capabilities.

use anyhow::Result;
use colored::Colorize;

use murmur_core::capabilities::{InputCapabilities, StaticCapabilities};
use murmur_core::config::{get_config_path, load_config};
use murmur_core::store::ChatStore;
use murmur_core::templates::default_templates;

/// What this terminal front-end can capture.
pub fn terminal_capabilities() -> StaticCapabilities {
    StaticCapabilities::text_only()
}

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();
    let store_dir = config.storage.resolved_dir();

    println!();
    println!("{}", "Murmur Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        mark(config_path.exists())
    );
    println!(
        "  {:<18} {} {}",
        "Store:".bold(),
        store_dir.display(),
        mark(store_dir.exists())
    );

    let store = crate::open_store(&config)?;
    println!(
        "  {:<18} {} saved, {}",
        "Chats:".bold(),
        store.list_sessions().len(),
        template_summary(&store)
    );

    let (min, max) = config.reply.delay_range();
    println!(
        "  {:<18} canned, {}–{} ms delay, timeout {}",
        "Replies:".bold(),
        min.as_millis(),
        max.as_millis(),
        match config.reply.timeout() {
            Some(t) => format!("{}s", t.as_secs()),
            None => "off".to_string(),
        }
    );

    let caps = terminal_capabilities();
    println!(
        "  {:<18} text{}",
        "Input:".bold(),
        if caps.voice_input_available() { ", voice" } else { "" }
    );
    println!();

    Ok(())
}

/// Describe the stored templates without seeding an empty store.
fn template_summary(store: &ChatStore) -> String {
    match store.load_prompt_templates() {
        Ok(Some(templates)) => format!("{} templates", templates.len()),
        Ok(None) => format!("{} templates (defaults, not seeded)", default_templates().len()),
        Err(e) => format!("templates unreadable ({e})"),
    }
}

fn mark(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use murmur_core::store::{KeyValueStore, MemoryStore, TEMPLATES_KEY};
    use murmur_core::types::PromptTemplate;

    #[test]
    fn terminal_has_no_voice_input() {
        assert!(!terminal_capabilities().voice_input_available());
    }

    #[test]
    fn template_summary_does_not_seed() {
        let medium = Arc::new(MemoryStore::new());
        let store = ChatStore::new(medium.clone());

        let summary = template_summary(&store);
        assert_eq!(summary, "5 templates (defaults, not seeded)");
        assert!(medium.get(TEMPLATES_KEY).unwrap().is_none());
    }

    #[test]
    fn template_summary_counts_stored() {
        let store = ChatStore::new(Arc::new(MemoryStore::new()));
        store
            .save_prompt_templates(&[PromptTemplate::new("9", "Haiku", "[TOPIC]", "Creative")])
            .unwrap();
        assert_eq!(template_summary(&store), "1 templates");
    }

    #[test]
    fn template_summary_reports_corrupt() {
        let medium = Arc::new(MemoryStore::new());
        medium.set(TEMPLATES_KEY, "{broken").unwrap();
        let store = ChatStore::new(medium.clone());
        assert!(template_summary(&store).starts_with("templates unreadable"));
        assert_eq!(medium.get(TEMPLATES_KEY).unwrap().as_deref(), Some("{broken"));
    }
}
