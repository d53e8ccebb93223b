//! PDF→docx conversion via the pdf2docx CLI
//!
//! Unlike pandoc, pdf2docx is not auto-provisioned: a missing tool is
//! terminal here.

use std::path::Path;
use std::process::Command;

use crate::error::{ConvertError, Result};

const TOOL: &str = "pdf2docx";

/// Convert a PDF back into a `.docx` document.
pub fn pdf_to_docx(pdf: &Path, docx: &Path) -> Result<()> {
    let binary =
        which::which(TOOL).map_err(|_| ConvertError::ToolNotFound(TOOL.to_string()))?;

    let output = Command::new(binary)
        .arg("convert")
        .arg(pdf)
        .arg(docx)
        .output()?;

    if !output.status.success() {
        return Err(ConvertError::ToolFailed {
            tool: TOOL.to_string(),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
