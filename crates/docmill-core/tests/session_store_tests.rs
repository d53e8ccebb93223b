//! Integration tests for the directory-backed session store

use std::fs;

use docmill_core::error::DocmillError;
use docmill_core::session::{SessionStore, SAMPLES_DIR, TEMPLATE_FILE};
use docmill_testkit::{temp_dir_in_workspace, write_csv, write_docx};

struct Inputs {
    _temp: tempfile::TempDir,
    store: SessionStore,
    template: std::path::PathBuf,
    dataset: std::path::PathBuf,
}

fn inputs() -> Inputs {
    let temp = temp_dir_in_workspace();
    let store = SessionStore::open(temp.path().join("store")).unwrap();

    let template = temp.path().join("letter.docx");
    write_docx(&template, &["Dear {{name}}"]);

    let dataset = temp.path().join("values.csv");
    write_csv(&dataset, &["name"], &[&["Ana"], &["Ben"]]);

    Inputs {
        _temp: temp,
        store,
        template,
        dataset,
    }
}

#[test]
fn create_then_load_roundtrip() {
    let ctx = inputs();

    let created = ctx
        .store
        .create("invoices", &ctx.template, &ctx.dataset)
        .unwrap();
    assert!(created.template_path.exists());
    assert!(created.dataset_path.as_ref().unwrap().exists());

    let loaded = ctx.store.load("invoices").unwrap();
    assert_eq!(loaded.name, "invoices");
    assert_eq!(loaded.template_path.file_name().unwrap(), TEMPLATE_FILE);
    assert_eq!(
        loaded.dataset_path.as_ref().unwrap().file_name().unwrap(),
        "dataset.csv"
    );
}

#[test]
fn create_duplicate_fails() {
    let ctx = inputs();
    ctx.store
        .create("dup", &ctx.template, &ctx.dataset)
        .unwrap();

    let err = ctx
        .store
        .create("dup", &ctx.template, &ctx.dataset)
        .unwrap_err();
    assert!(matches!(err, DocmillError::SessionExists(name) if name == "dup"));
}

#[test]
fn create_rejects_unknown_dataset_format_before_writing() {
    let ctx = inputs();
    let bad = ctx.dataset.with_extension("txt");
    fs::copy(&ctx.dataset, &bad).unwrap();

    let err = ctx.store.create("bad", &ctx.template, &bad).unwrap_err();
    assert!(matches!(err, DocmillError::UnsupportedFormat(_)));
    // Eager validation: no session directory was created
    assert!(!ctx.store.root().join("bad").exists());
}

#[test]
fn create_rejects_non_docx_template() {
    let ctx = inputs();
    let err = ctx
        .store
        .create("bad", &ctx.dataset, &ctx.dataset)
        .unwrap_err();
    assert!(matches!(err, DocmillError::InvalidDocument { .. }));
}

#[test]
fn load_missing_session_fails() {
    let ctx = inputs();
    let err = ctx.store.load("ghost").unwrap_err();
    assert!(matches!(err, DocmillError::SessionNotFound(name) if name == "ghost"));
}

#[test]
fn session_without_dataset_loads_with_none() {
    let ctx = inputs();
    let session = ctx
        .store
        .create("partial", &ctx.template, &ctx.dataset)
        .unwrap();
    fs::remove_file(session.dataset_path.unwrap()).unwrap();

    let loaded = ctx.store.load("partial").unwrap();
    assert!(loaded.dataset_path.is_none());
}

#[test]
fn list_excludes_reserved_and_hidden_directories() {
    let ctx = inputs();
    ctx.store
        .create("beta", &ctx.template, &ctx.dataset)
        .unwrap();
    ctx.store
        .create("alpha", &ctx.template, &ctx.dataset)
        .unwrap();
    fs::create_dir(ctx.store.root().join(SAMPLES_DIR)).unwrap();
    fs::create_dir(ctx.store.root().join(".hidden")).unwrap();
    fs::write(ctx.store.root().join("stray.txt"), "not a session").unwrap();

    assert_eq!(ctx.store.list().unwrap(), vec!["alpha", "beta"]);
}

#[test]
fn delete_removes_session_directory() {
    let ctx = inputs();
    ctx.store
        .create("gone", &ctx.template, &ctx.dataset)
        .unwrap();

    ctx.store.delete("gone").unwrap();
    assert!(!ctx.store.root().join("gone").exists());
    assert!(ctx.store.list().unwrap().is_empty());
}

#[test]
fn delete_missing_session_leaves_filesystem_unchanged() {
    let ctx = inputs();
    ctx.store
        .create("keep", &ctx.template, &ctx.dataset)
        .unwrap();

    let err = ctx.store.delete("ghost").unwrap_err();
    assert!(matches!(err, DocmillError::SessionNotFound(_)));
    assert_eq!(ctx.store.list().unwrap(), vec!["keep"]);
}

#[test]
fn replace_template_overwrites_in_place() {
    let ctx = inputs();
    ctx.store
        .create("letters", &ctx.template, &ctx.dataset)
        .unwrap();

    let new_template = ctx.template.with_file_name("revised.docx");
    write_docx(&new_template, &["Hello {{name}}, revised"]);
    ctx.store.replace_template("letters", &new_template).unwrap();

    let session = ctx.store.load("letters").unwrap();
    let stored = fs::read(&session.template_path).unwrap();
    assert_eq!(stored, fs::read(&new_template).unwrap());
}

#[test]
fn replace_dataset_switches_extension_and_drops_old_file() {
    let ctx = inputs();
    ctx.store
        .create("switch", &ctx.template, &ctx.dataset)
        .unwrap();

    // A different extension replaces the stored file entirely; we fake an
    // xlsx payload since only the extension drives storage naming here.
    let xlsx = ctx.dataset.with_extension("xlsx");
    fs::write(&xlsx, b"not really a workbook").unwrap();
    ctx.store.replace_dataset("switch", &xlsx).unwrap();

    let session = ctx.store.load("switch").unwrap();
    assert_eq!(
        session.dataset_path.as_ref().unwrap().file_name().unwrap(),
        "dataset.xlsx"
    );
    assert!(!session.dir.join("dataset.csv").exists());
}

#[test]
fn replace_does_not_invalidate_generated_outputs() {
    // Known consistency gap, kept by design: overwriting inputs leaves
    // previously generated outputs stale.
    let ctx = inputs();
    let session = ctx
        .store
        .create("stale", &ctx.template, &ctx.dataset)
        .unwrap();
    fs::write(session.dir.join("letters-Ana.pdf"), b"%PDF-old").unwrap();

    let new_template = ctx.template.with_file_name("revised.docx");
    write_docx(&new_template, &["Hi {{name}}"]);
    ctx.store.replace_template("stale", &new_template).unwrap();

    assert_eq!(
        fs::read(session.dir.join("letters-Ana.pdf")).unwrap(),
        b"%PDF-old"
    );
}
