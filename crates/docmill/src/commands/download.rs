//! Download command - package previously generated outputs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use docmill_core::batch;
use docmill_core::session::SessionStore;

pub fn run(store_root: &Path, name: &str, output: Option<PathBuf>) -> Result<()> {
    let store = SessionStore::open(store_root)?;
    let session = store.load(name)?;

    let archive = batch::archive_outputs(&session)?;

    let archive_path = output.unwrap_or_else(|| PathBuf::from(format!("{name}.zip")));
    fs::write(&archive_path, &archive)?;

    println!(
        "{} Packaged existing outputs of '{}' → {}",
        "✓".green().bold(),
        name,
        archive_path.display()
    );
    Ok(())
}
