//! `murmur templates` — browse and fill prompt templates.
//!
//! - `murmur templates list`
//! - `murmur templates show <ID>`
//! - `murmur templates fill <ID> KEY=VALUE...` — print the filled prompt
//! - `murmur templates reset` — restore the built-in set

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use murmur_core::config::load_config;
use murmur_core::store::ChatStore;
use murmur_core::templates::{default_templates, parse_assignments};

/// Templates subcommands.
#[derive(Subcommand)]
pub enum TemplatesCommands {
    /// List prompt templates
    List,

    /// Show a template and its placeholders
    Show {
        /// Template ID
        id: String,
    },

    /// Print a template with placeholders filled in
    Fill {
        /// Template ID
        id: String,

        /// Placeholder values, e.g. topic=rust
        values: Vec<String>,
    },

    /// Replace stored templates with the built-in set
    Reset,
}

/// Dispatch a templates subcommand.
pub fn dispatch(cmd: TemplatesCommands) -> Result<()> {
    let config = load_config(None);
    let store = crate::open_store(&config)?;

    match cmd {
        TemplatesCommands::List => list(&store),
        TemplatesCommands::Show { id } => show(&store, &id),
        TemplatesCommands::Fill { id, values } => fill(&store, &id, &values),
        TemplatesCommands::Reset => reset(&store),
    }
}

fn list(store: &ChatStore) -> Result<()> {
    println!();
    for t in store.list_prompt_templates() {
        println!("  {:>3}  {:<20} {}", t.id, t.title.bold(), t.category.dimmed());
    }
    println!();
    Ok(())
}

fn show(store: &ChatStore, id: &str) -> Result<()> {
    let template = store
        .find_prompt_template(id)
        .with_context(|| format!("no prompt template with id '{id}'"))?;

    println!();
    println!("{}  {}", template.title.bold(), template.category.dimmed());
    println!("{}", template.content);
    let placeholders = template.placeholders();
    if !placeholders.is_empty() {
        println!();
        println!("{} {}", "Placeholders:".dimmed(), placeholders.join(", "));
    }
    println!();
    Ok(())
}

fn fill(store: &ChatStore, id: &str, values: &[String]) -> Result<()> {
    let template = store
        .find_prompt_template(id)
        .with_context(|| format!("no prompt template with id '{id}'"))?;

    let values = parse_assignments(values);
    if !template.is_complete(&values) {
        eprintln!(
            "{} {}",
            "warning: unfilled placeholders:".yellow(),
            template.placeholders().join(", ")
        );
    }
    println!("{}", template.fill(&values));
    Ok(())
}

fn reset(store: &ChatStore) -> Result<()> {
    let defaults = default_templates();
    store
        .save_prompt_templates(&defaults)
        .context("failed to save prompt templates")?;
    println!("{} {} built-in templates", "Restored".green(), defaults.len());
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
