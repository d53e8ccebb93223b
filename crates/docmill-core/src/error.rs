use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocmillError {
    // Session errors
    #[error("SESSION_NOT_FOUND: session '{0}' does not exist")]
    SessionNotFound(String),

    #[error("SESSION_EXISTS: session '{0}' already exists")]
    SessionExists(String),

    #[error("SESSION_INVALID_NAME: '{name}': {reason}")]
    SessionInvalidName { name: String, reason: String },

    // Dataset errors
    #[error("DATASET_UNSUPPORTED_FORMAT: '{}' is not a .xlsx or .csv file", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("DATASET_PARSE_ERROR: failed to read '{}': {reason}", path.display())]
    DatasetParse { path: PathBuf, reason: String },

    #[error("DATASET_MISSING: session '{0}' has no dataset file")]
    DatasetMissing(String),

    // Template / token errors
    #[error("TEMPLATE_NO_TOKENS: template contains no {{{{...}}}} placeholders")]
    EmptyTokenSet,

    #[error("TOKEN_MISMATCH: dataset has no column for tokens: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("FILENAME_COLUMN_NOT_FOUND: column '{0}' does not exist in the dataset")]
    FilenameColumnNotFound(String),

    // Document errors
    #[error("DOCUMENT_INVALID: '{}': {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    // Render errors
    #[error("RENDER_FAILED: {0}")]
    Render(String),

    // Archive errors
    #[error("ARCHIVE_ERROR: {0}")]
    Archive(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for DocmillError {
    fn from(err: zip::result::ZipError) -> Self {
        DocmillError::Archive(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocmillError>;
