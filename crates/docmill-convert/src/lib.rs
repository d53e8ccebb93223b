//! Format conversion collaborator
//!
//! Wraps the external tools that turn substituted documents into their
//! distributable form: pandoc for docx→PDF (auto-provisioned into a
//! managed cache when missing) and pdf2docx for PDF→docx.

pub mod error;
pub mod install;
pub mod pandoc;
pub mod pdf;

pub use error::{ConvertError, Result};
pub use pandoc::{docx_to_pdf, PandocRenderer};
pub use pdf::pdf_to_docx;
