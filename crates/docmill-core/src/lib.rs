//! Core pipeline for template-driven batch document generation.
//!
//! A `.docx` template with `{{name}}` placeholders plus a tabular dataset
//! produce one substituted document and one rendered PDF per row. Sessions
//! (template + dataset + generated outputs) persist as directories and can
//! be re-generated or re-downloaded later.

pub mod batch;
pub mod bind;
pub mod dataset;
pub mod docio;
pub mod error;
pub mod session;
pub mod template;

pub use error::{DocmillError, Result};
