//! Tabular dataset input
//!
//! Reads `.csv` (first record is the header) or `.xlsx` (first sheet,
//! first row is the header) into named columns and string rows. Any other
//! extension is rejected up front with `UnsupportedFormat`, before any
//! bytes are read.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::error::{DocmillError, Result};

/// Dataset file extensions recognized by the store and the reader.
pub const DATASET_EXTENSIONS: &[&str] = &["xlsx", "csv"];

/// A table of named columns and rows of scalar values, coerced to strings.
///
/// Row order is the file's row order and stays stable through the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Read a dataset file, dispatching on its extension.
    pub fn read(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => read_csv(path),
            Some("xlsx") => read_xlsx(path),
            _ => Err(DocmillError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of data rows (header excluded).
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Value of `column` in row `row`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

fn read_csv(path: &Path) -> Result<Dataset> {
    let parse = |reason: String| DocmillError::DatasetParse {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::Reader::from_path(path).map_err(|e| parse(e.to_string()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| parse(e.to_string()))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        // Ragged rows pad out to the column count
        row.resize(columns.len(), String::new());
        rows.push(row);
    }

    Ok(Dataset { columns, rows })
}

fn read_xlsx(path: &Path) -> Result<Dataset> {
    let parse = |reason: String| DocmillError::DatasetParse {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: calamine::XlsxError| parse(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| parse("workbook has no sheets".to_string()))?
        .map_err(|e| parse(e.to_string()))?;

    let mut cells = range.rows();
    let columns: Vec<String> = match cells.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return Ok(Dataset::from_parts(Vec::new(), Vec::new())),
    };

    let rows = cells
        .map(|row| {
            let mut values: Vec<String> = row.iter().map(cell_to_string).collect();
            values.resize(columns.len(), String::new());
            values
        })
        .collect();

    Ok(Dataset { columns, rows })
}

/// Default string conversion for spreadsheet scalars.
///
/// Integral floats drop the trailing `.0` so numeric ID columns stay usable
/// as filenames and substitution values.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", *f as i64)
        }
        other => other.to_string(),
    }
}
