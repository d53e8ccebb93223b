//! Tokens command - show a template's placeholder set

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use docmill_core::docio::WordDocument;
use docmill_core::template::extract_tokens;

use crate::output::print_json;

pub fn run(template: &Path, json: bool) -> Result<()> {
    let document = WordDocument::open(template)?;
    let tokens = extract_tokens(&document.template());

    if json {
        let names: Vec<&str> = tokens.iter().map(String::as_str).collect();
        print_json(&serde_json::to_string(&names)?)?;
        return Ok(());
    }

    if tokens.is_empty() {
        println!("{} No {{{{...}}}} placeholders found", "!".yellow());
    } else {
        for token in &tokens {
            println!("{token}");
        }
    }
    Ok(())
}
