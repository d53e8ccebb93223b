//! Batch generation orchestrator
//!
//! Drives the pipeline across every dataset row: bind, substitute, render,
//! stage into the downloadable archive. Preconditions (non-empty token
//! set, token ⊆ columns, filename column present) are checked before any
//! row work so a violation never leaves partial output behind. A renderer
//! failure aborts the whole batch.
//!
//! Execution is single-threaded and synchronous; one batch per session at
//! a time is the caller's responsibility (there is no file locking).

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::bind::{self, Binding};
use crate::dataset::Dataset;
use crate::docio::WordDocument;
use crate::error::{DocmillError, Result};
use crate::session::Session;
use crate::template::{extract_tokens, substitute};

/// The render collaborator seam: turns a substituted document into its
/// distributable PDF. Fallible and potentially slow; rendering dominates
/// wall-clock cost of a batch.
pub trait Renderer {
    fn render_to_pdf(&self, docx: &Path, pdf: &Path) -> Result<()>;
}

/// Rendering font options forwarded to the renderer implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub size_pt: u32,
}

/// Batch parameters. Progress is reported after each completed row as
/// `(rows_done, total_rows)`; there is no sub-row granularity.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Base name for generated files: `{base}_{row}.docx` intermediates
    /// and `{base}-{filename value}.pdf` outputs.
    pub output_name_base: String,
    /// Dataset column whose per-row value names the rendered output. Rows
    /// sharing a value overwrite each other's archive entry (last row
    /// wins).
    pub filename_column: String,
    pub progress: Option<fn(usize, usize)>,
}

/// Result of a completed batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// In-memory zip of the rendered outputs, one entry per distinct name.
    pub archive: Vec<u8>,
    /// Archive entry names, in first-staged order.
    pub entries: Vec<String>,
    /// Dataset rows processed.
    pub rows: usize,
    /// Placeholder occurrences left verbatim, summed across rows. Nonzero
    /// means the template references tokens the binding did not cover;
    /// callers should warn, not fail.
    pub unresolved_tokens: usize,
}

/// Run the full pipeline over every row of the session's dataset.
///
/// Intermediate `.docx` files and rendered `.pdf` files are persisted in
/// the session directory, so outputs can be re-downloaded later without
/// re-generation.
pub fn generate(
    session: &Session,
    renderer: &dyn Renderer,
    options: &GenerateOptions,
) -> Result<BatchOutcome> {
    let document = WordDocument::open(&session.template_path)?;
    let template = document.template();

    let tokens = extract_tokens(&template);
    if tokens.is_empty() {
        return Err(DocmillError::EmptyTokenSet);
    }

    let dataset_path = session
        .dataset_path
        .as_deref()
        .ok_or_else(|| DocmillError::DatasetMissing(session.name.clone()))?;
    let dataset = Dataset::read(dataset_path)?;

    bind::check_columns(&tokens, dataset.columns())?;
    if !dataset.has_column(&options.filename_column) {
        return Err(DocmillError::FilenameColumnNotFound(
            options.filename_column.clone(),
        ));
    }

    let total = dataset.rows();
    let mut staged: Vec<(String, Vec<u8>)> = Vec::with_capacity(total);
    let mut unresolved_tokens = 0;

    for row in 0..total {
        let binding: Binding = bind::bind(&tokens, &dataset, row);
        let substitution = substitute(&template, &binding);
        unresolved_tokens += substitution.unresolved;

        // Row indices are 1-based in filenames
        let docx_path = session
            .dir
            .join(format!("{}_{}.docx", options.output_name_base, row + 1));
        document.write_substituted(&substitution.blocks, &docx_path)?;

        let key = dataset
            .value(row, &options.filename_column)
            .unwrap_or_default();
        let pdf_name = format!("{}-{}.pdf", options.output_name_base, key);
        let pdf_path = session.dir.join(&pdf_name);
        renderer.render_to_pdf(&docx_path, &pdf_path)?;

        stage(&mut staged, pdf_name, fs::read(&pdf_path)?);

        if let Some(progress) = options.progress {
            progress(row + 1, total);
        }
    }

    let entries = staged.iter().map(|(name, _)| name.clone()).collect();
    let archive = build_archive(&staged)?;

    Ok(BatchOutcome {
        archive,
        entries,
        rows: total,
        unresolved_tokens,
    })
}

/// Zip the session's previously rendered `.pdf` files for re-download,
/// without regenerating anything.
pub fn archive_outputs(session: &Session) -> Result<Vec<u8>> {
    let mut staged: Vec<(String, Vec<u8>)> = Vec::new();
    for entry in fs::read_dir(&session.dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("pdf") {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        staged.push((name, fs::read(&path)?));
    }
    staged.sort_by(|(a, _), (b, _)| a.cmp(b));
    build_archive(&staged)
}

/// Stage bytes under a name, replacing any earlier entry with the same
/// name (filename collisions: last row wins).
fn stage(staged: &mut Vec<(String, Vec<u8>)>, name: String, bytes: Vec<u8>) {
    match staged.iter_mut().find(|(existing, _)| *existing == name) {
        Some((_, existing_bytes)) => *existing_bytes = bytes,
        None => staged.push((name, bytes)),
    }
}

/// Build the in-memory zip. Entries are stored uncompressed; PDF payloads
/// barely compress and the archive is transient.
fn build_archive(staged: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, bytes) in staged {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}
