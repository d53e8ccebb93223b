//! Session lifecycle commands: new, list, delete, replace

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;
use docmill_core::docio::WordDocument;
use docmill_core::session::SessionStore;
use docmill_core::template::extract_tokens;

use crate::output::print_json;

pub fn run_new(
    store_root: &Path,
    name: &str,
    template: &Path,
    dataset: &Path,
    verbose: bool,
) -> Result<()> {
    let store = SessionStore::open(store_root)?;

    if verbose {
        println!(
            "{} Creating session '{}' in {}",
            "→".cyan(),
            name,
            store.root().display()
        );
    }

    let session = store.create(name, template, dataset)?;

    let document = WordDocument::open(&session.template_path)?;
    let tokens = extract_tokens(&document.template());

    println!("{} Created session '{}'", "✓".green().bold(), name);
    if tokens.is_empty() {
        println!(
            "{} template contains no {{{{...}}}} placeholders; generation will be refused",
            "!".yellow()
        );
    } else {
        let names: Vec<&str> = tokens.iter().map(String::as_str).collect();
        println!("  tokens: {}", names.join(", "));
    }

    Ok(())
}

pub fn run_list(store_root: &Path, json: bool) -> Result<()> {
    let store = SessionStore::open(store_root)?;
    let names = store.list()?;

    if json {
        print_json(&serde_json::to_string(&names)?)?;
        return Ok(());
    }

    if names.is_empty() {
        println!("{} No sessions found", "!".yellow());
    } else {
        for name in &names {
            println!("{name}");
        }
    }
    Ok(())
}

pub fn run_delete(store_root: &Path, name: &str) -> Result<()> {
    let store = SessionStore::open(store_root)?;
    store.delete(name)?;
    println!("{} Deleted session '{}'", "✓".green().bold(), name);
    Ok(())
}

pub fn run_replace(
    store_root: &Path,
    name: &str,
    template: Option<&Path>,
    dataset: Option<&Path>,
) -> Result<()> {
    if template.is_none() && dataset.is_none() {
        bail!("nothing to replace: pass --template and/or --dataset");
    }

    let store = SessionStore::open(store_root)?;

    if let Some(template) = template {
        store.replace_template(name, template)?;
        println!("{} Replaced template of '{}'", "✓".green().bold(), name);
    }
    if let Some(dataset) = dataset {
        store.replace_dataset(name, dataset)?;
        println!("{} Replaced dataset of '{}'", "✓".green().bold(), name);
    }

    // Stored outputs are not invalidated; the next generate run picks up
    // the new inputs
    Ok(())
}
