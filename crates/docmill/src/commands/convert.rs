//! One-shot converter pair: docx→PDF and PDF→docx

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use docmill_convert::{docx_to_pdf, pdf_to_docx};

pub fn run_docx_to_pdf(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| input.with_extension("pdf"));
    docx_to_pdf(input, &output, None)?;
    println!("{} {} → {}", "✓".green().bold(), input.display(), output.display());
    Ok(())
}

pub fn run_pdf_to_docx(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| input.with_extension("docx"));
    pdf_to_docx(input, &output)?;
    println!("{} {} → {}", "✓".green().bold(), input.display(), output.display());
    Ok(())
}
