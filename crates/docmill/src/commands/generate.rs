//! Generate command - run the batch pipeline over a session

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use docmill_core::batch::{self, FontSpec, GenerateOptions};
use docmill_core::session::SessionStore;
use docmill_convert::PandocRenderer;

#[allow(clippy::too_many_arguments)]
pub fn run(
    store_root: &Path,
    name: &str,
    base: Option<String>,
    filename_column: String,
    font: Option<String>,
    font_size: u32,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let store = SessionStore::open(store_root)?;
    let session = store.load(name)?;

    let font = font.map(|family| FontSpec {
        family,
        size_pt: font_size,
    });
    let renderer = PandocRenderer::new(font);

    let options = GenerateOptions {
        output_name_base: base.unwrap_or_else(|| name.to_string()),
        filename_column,
        progress: Some(print_progress),
    };

    if verbose {
        println!(
            "{} Generating documents for session '{}'",
            "→".cyan(),
            name
        );
    }

    let outcome = batch::generate(&session, &renderer, &options)?;

    if outcome.unresolved_tokens > 0 {
        println!(
            "{} {} placeholder occurrence(s) had no value and were left as-is",
            "!".yellow(),
            outcome.unresolved_tokens
        );
    }

    let archive_path = output.unwrap_or_else(|| PathBuf::from(format!("{name}.zip")));
    fs::write(&archive_path, &outcome.archive)?;

    println!(
        "{} Generated {} document(s) → {}",
        "✓".green().bold(),
        outcome.rows,
        archive_path.display()
    );
    Ok(())
}

fn print_progress(done: usize, total: usize) {
    println!("  [{done}/{total}] rendered");
}
