//! Test utilities for docmill
//!
//! Shared fixtures used across the workspace: workspace-local temporary
//! directories, minimal `.docx` builders, and dataset file builders.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Creates a temporary directory within `.tmp/` at the workspace root.
///
/// Centralizes test temp files in one gitignored location. The directory
/// cleans up on drop.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot
/// be created. Test-only code.
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");
    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Write a minimal but valid `.docx` file with one paragraph per entry.
///
/// The container carries the three parts Word requires:
/// `[Content_Types].xml`, `_rels/.rels`, and `word/document.xml`. Each
/// paragraph becomes a single run.
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let file = File::create(path).expect("create docx fixture");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    writer
        .start_file("[Content_Types].xml", options)
        .expect("start content types");
    writer
        .write_all(CONTENT_TYPES.as_bytes())
        .expect("write content types");

    writer
        .start_file("_rels/.rels", options)
        .expect("start rels");
    writer.write_all(RELS.as_bytes()).expect("write rels");

    writer
        .start_file("word/document.xml", options)
        .expect("start document");
    writer
        .write_all(document_xml(paragraphs).as_bytes())
        .expect("write document");

    writer.finish().expect("finish docx fixture");
}

/// Scalar cell value for `.xlsx` fixtures.
pub enum XlsxCell<'a> {
    Text(&'a str),
    Number(f64),
}

/// Write a minimal `.xlsx` workbook with one sheet: a header row followed
/// by data rows.
///
/// Strings are stored inline, so no shared-strings part is needed. Fixture
/// tables stay under 26 columns.
pub fn write_xlsx(path: &Path, header: &[&str], rows: &[&[XlsxCell]]) {
    let file = File::create(path).expect("create xlsx fixture");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let sheet = sheet_xml(header, rows);
    let parts = [
        ("[Content_Types].xml", XLSX_CONTENT_TYPES),
        ("_rels/.rels", XLSX_RELS),
        ("xl/workbook.xml", XLSX_WORKBOOK),
        ("xl/_rels/workbook.xml.rels", XLSX_WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ];
    for (name, contents) in parts {
        writer.start_file(name, options).expect("start xlsx part");
        writer
            .write_all(contents.as_bytes())
            .expect("write xlsx part");
    }
    writer.finish().expect("finish xlsx fixture");
}

/// Write a `.csv` dataset file with a header row.
pub fn write_csv(path: &Path, header: &[&str], rows: &[&[&str]]) {
    let mut contents = String::new();
    contents.push_str(&header.join(","));
    contents.push('\n');
    for row in rows {
        contents.push_str(&row.join(","));
        contents.push('\n');
    }
    std::fs::write(path, contents).expect("write csv fixture");
}

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

const XLSX_CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"</Types>"#,
);

const XLSX_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

const XLSX_WORKBOOK: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    r#"<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>"#,
    r#"</workbook>"#,
);

const XLSX_WORKBOOK_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"</Relationships>"#,
);

fn sheet_xml(header: &[&str], rows: &[&[XlsxCell]]) -> String {
    let mut sheet_data = String::new();
    let header_cells: Vec<XlsxCell> = header.iter().map(|&h| XlsxCell::Text(h)).collect();
    push_row(&mut sheet_data, 1, &header_cells);
    for (i, row) in rows.iter().enumerate() {
        push_row(&mut sheet_data, i + 2, row);
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
            "<sheetData>{}</sheetData></worksheet>",
        ),
        sheet_data
    )
}

fn push_row(out: &mut String, number: usize, cells: &[XlsxCell]) {
    out.push_str(&format!(r#"<row r="{number}">"#));
    for (i, cell) in cells.iter().enumerate() {
        let column = (b'A' + i as u8) as char;
        match cell {
            XlsxCell::Text(text) => out.push_str(&format!(
                r#"<c r="{column}{number}" t="inlineStr"><is><t>{}</t></is></c>"#,
                escape_xml(text)
            )),
            XlsxCell::Number(value) => {
                out.push_str(&format!(r#"<c r="{column}{number}"><v>{value}</v></c>"#))
            }
        }
    }
    out.push_str("</row>");
}

fn document_xml(paragraphs: &[&str]) -> String {
    let mut body = String::new();
    for text in paragraphs {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&escape_xml(text));
        body.push_str("</w:t></w:r></w:p>");
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            "<w:body>{}</w:body></w:document>",
        ),
        body
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
