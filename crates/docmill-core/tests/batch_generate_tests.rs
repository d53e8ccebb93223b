//! Integration tests for the batch orchestrator
//!
//! Uses a byte-copying fake renderer so the pipeline runs without pandoc.

use std::cell::Cell;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use docmill_core::batch::{self, GenerateOptions, Renderer};
use docmill_core::docio::WordDocument;
use docmill_core::error::{DocmillError, Result};
use docmill_core::session::{Session, SessionStore};
use docmill_testkit::{temp_dir_in_workspace, write_csv, write_docx};

/// "Renders" by copying the substituted document's bytes to the PDF path.
struct FakeRenderer;

impl Renderer for FakeRenderer {
    fn render_to_pdf(&self, docx: &Path, pdf: &Path) -> Result<()> {
        fs::copy(docx, pdf)?;
        Ok(())
    }
}

/// Fails on the nth call, succeeding before that.
struct FailingRenderer {
    calls: Cell<usize>,
    fail_on: usize,
}

impl Renderer for FailingRenderer {
    fn render_to_pdf(&self, docx: &Path, pdf: &Path) -> Result<()> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_on {
            return Err(DocmillError::Render("conversion tool exploded".into()));
        }
        fs::copy(docx, pdf)?;
        Ok(())
    }
}

fn session_with(
    template_blocks: &[&str],
    header: &[&str],
    rows: &[&[&str]],
) -> (tempfile::TempDir, Session) {
    let temp = temp_dir_in_workspace();
    let store = SessionStore::open(temp.path().join("store")).unwrap();

    let template = temp.path().join("letter.docx");
    write_docx(&template, template_blocks);
    let dataset = temp.path().join("values.csv");
    write_csv(&dataset, header, rows);

    let session = store.create("batch", &template, &dataset).unwrap();
    (temp, session)
}

fn options(base: &str, filename_column: &str) -> GenerateOptions {
    GenerateOptions {
        output_name_base: base.to_string(),
        filename_column: filename_column.to_string(),
        progress: None,
    }
}

fn archive_names(archive: &[u8]) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn generates_one_entry_per_row() {
    let (_temp, session) = session_with(
        &["Dear {{name}}, your balance is {{amount}}."],
        &["name", "amount"],
        &[&["Ana", "42"], &["Ben", "7"], &["Cleo", "100"]],
    );

    let outcome = batch::generate(&session, &FakeRenderer, &options("letter", "name")).unwrap();

    assert_eq!(outcome.rows, 3);
    assert_eq!(outcome.unresolved_tokens, 0);
    assert_eq!(
        outcome.entries,
        vec!["letter-Ana.pdf", "letter-Ben.pdf", "letter-Cleo.pdf"]
    );
    assert_eq!(archive_names(&outcome.archive), outcome.entries);

    // Intermediate documents and rendered outputs persist in the session
    // directory for later re-download
    for i in 1..=3 {
        assert!(session.dir.join(format!("letter_{i}.docx")).exists());
    }
    assert!(session.dir.join("letter-Ben.pdf").exists());
}

#[test]
fn substituted_documents_carry_row_values() {
    let (_temp, session) = session_with(
        &["Dear {{name}}, your balance is {{amount}}."],
        &["name", "amount"],
        &[&["Ana", "42"]],
    );

    batch::generate(&session, &FakeRenderer, &options("letter", "name")).unwrap();

    let generated = WordDocument::open(&session.dir.join("letter_1.docx")).unwrap();
    assert_eq!(
        generated.template().blocks(),
        &["Dear Ana, your balance is 42.".to_string()]
    );
}

#[test]
fn progress_reaches_total_exactly_once_after_last_row() {
    thread_local! {
        static REPORTS: std::cell::RefCell<Vec<(usize, usize)>> =
            const { std::cell::RefCell::new(Vec::new()) };
    }
    fn record(done: usize, total: usize) {
        REPORTS.with(|r| r.borrow_mut().push((done, total)));
    }

    let (_temp, session) = session_with(
        &["{{k}}"],
        &["k"],
        &[&["a"], &["b"], &["c"], &["d"]],
    );

    let mut opts = options("out", "k");
    opts.progress = Some(record);
    batch::generate(&session, &FakeRenderer, &opts).unwrap();

    let reports = REPORTS.with(|r| r.borrow().clone());
    assert_eq!(reports, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    assert_eq!(reports.iter().filter(|(done, total)| done == total).count(), 1);
}

#[test]
fn template_without_tokens_is_refused() {
    let (_temp, session) = session_with(&["Nothing to fill in."], &["name"], &[&["Ana"]]);

    let err = batch::generate(&session, &FakeRenderer, &options("out", "name")).unwrap_err();
    assert!(matches!(err, DocmillError::EmptyTokenSet));
    assert!(!session.dir.join("out_1.docx").exists());
}

#[test]
fn token_mismatch_fails_before_any_row() {
    let (_temp, session) = session_with(
        &["{{name}} owes {{amount}} since {{due}}"],
        &["name"],
        &[&["Ana"], &["Ben"]],
    );

    let err = batch::generate(&session, &FakeRenderer, &options("out", "name")).unwrap_err();
    match err {
        DocmillError::MissingColumns { missing } => {
            assert_eq!(missing, vec!["amount".to_string(), "due".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    // Fail-fast: no partial output
    assert!(!session.dir.join("out_1.docx").exists());
}

#[test]
fn unknown_filename_column_is_rejected() {
    let (_temp, session) = session_with(&["{{name}}"], &["name"], &[&["Ana"]]);

    let err = batch::generate(&session, &FakeRenderer, &options("out", "id")).unwrap_err();
    assert!(matches!(err, DocmillError::FilenameColumnNotFound(col) if col == "id"));
}

#[test]
fn missing_dataset_is_rejected() {
    let (_temp, session) = session_with(&["{{name}}"], &["name"], &[&["Ana"]]);
    fs::remove_file(session.dataset_path.as_ref().unwrap()).unwrap();
    let store = SessionStore::open(session.dir.parent().unwrap()).unwrap();
    let reloaded = store.load("batch").unwrap();

    let err = batch::generate(&reloaded, &FakeRenderer, &options("out", "name")).unwrap_err();
    assert!(matches!(err, DocmillError::DatasetMissing(_)));
}

#[test]
fn filename_collision_keeps_last_row() {
    let (_temp, session) = session_with(
        &["row for {{name}} / {{id}}"],
        &["name", "id"],
        &[&["Ana", "1"], &["Ana", "2"]],
    );

    let outcome = batch::generate(&session, &FakeRenderer, &options("out", "name")).unwrap();

    // Two rows, one archive entry: the second row overwrote the first
    assert_eq!(outcome.rows, 2);
    assert_eq!(outcome.entries, vec!["out-Ana.pdf"]);

    let mut zip = zip::ZipArchive::new(Cursor::new(outcome.archive)).unwrap();
    let mut entry_bytes = Vec::new();
    std::io::Read::read_to_end(&mut zip.by_index(0).unwrap(), &mut entry_bytes).unwrap();
    let second_row_docx = fs::read(session.dir.join("out_2.docx")).unwrap();
    assert_eq!(entry_bytes, second_row_docx);
}

#[test]
fn renderer_failure_aborts_batch() {
    let (_temp, session) = session_with(
        &["{{k}}"],
        &["k"],
        &[&["a"], &["b"], &["c"]],
    );
    let renderer = FailingRenderer {
        calls: Cell::new(0),
        fail_on: 2,
    };

    let err = batch::generate(&session, &renderer, &options("out", "k")).unwrap_err();
    assert!(matches!(err, DocmillError::Render(_)));

    // Row 1 completed and its files remain; row 3 was never started
    assert!(session.dir.join("out_1.docx").exists());
    assert!(session.dir.join("out-a.pdf").exists());
    assert!(!session.dir.join("out_3.docx").exists());
}

#[test]
fn empty_dataset_yields_empty_archive() {
    let (_temp, session) = session_with(&["{{name}}"], &["name"], &[]);

    let outcome = batch::generate(&session, &FakeRenderer, &options("out", "name")).unwrap();
    assert_eq!(outcome.rows, 0);
    assert!(outcome.entries.is_empty());
    assert!(archive_names(&outcome.archive).is_empty());
}

#[test]
fn archive_outputs_packs_existing_pdfs_only() {
    let (_temp, session) = session_with(&["{{name}}"], &["name"], &[&["Ana"]]);
    fs::write(session.dir.join("old-Ben.pdf"), b"%PDF-ben").unwrap();
    fs::write(session.dir.join("old-Ana.pdf"), b"%PDF-ana").unwrap();
    fs::write(session.dir.join("notes.txt"), b"ignore me").unwrap();

    let archive = batch::archive_outputs(&session).unwrap();
    assert_eq!(archive_names(&archive), vec!["old-Ana.pdf", "old-Ben.pdf"]);
}
