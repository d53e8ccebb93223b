//! Pandoc execution for docx→PDF rendering
//!
//! Binary resolution order: `DOCMILL_PANDOC`, `pandoc` on PATH, then the
//! managed cache. When no binary resolves (or spawning fails because the
//! file vanished), the tool is provisioned into the cache and the
//! conversion retried exactly once; any failure after that propagates.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use docmill_core::batch::{FontSpec, Renderer};
use docmill_core::DocmillError;

use crate::error::{ConvertError, Result};
use crate::install;

/// Environment variable overriding pandoc resolution.
pub const PANDOC_ENV: &str = "DOCMILL_PANDOC";

const TOOL: &str = "pandoc";

/// Resolve the pandoc binary without provisioning.
pub fn resolve_pandoc() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(PANDOC_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    if let Ok(path) = which::which(TOOL) {
        return Some(path);
    }
    install::cached_binary()
}

/// Convert a `.docx` file to PDF, self-healing a missing pandoc install.
pub fn docx_to_pdf(docx: &Path, pdf: &Path, font: Option<&FontSpec>) -> Result<()> {
    let attempt = match resolve_pandoc() {
        Some(binary) => run_pandoc(&binary, docx, pdf, font),
        None => Err(ConvertError::ToolNotFound(TOOL.to_string())),
    };

    match attempt {
        // One recovery attempt for the known tool-missing condition
        Err(ConvertError::ToolNotFound(_)) => {
            let binary = install::provision()?;
            run_pandoc(&binary, docx, pdf, font)
        }
        other => other,
    }
}

fn run_pandoc(binary: &Path, docx: &Path, pdf: &Path, font: Option<&FontSpec>) -> Result<()> {
    let mut command = Command::new(binary);
    command
        .arg(docx)
        .arg("-o")
        .arg(pdf)
        .arg("--pdf-engine=xelatex");
    for arg in font_args(font) {
        command.arg(arg);
    }

    let output = command.output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ConvertError::ToolNotFound(TOOL.to_string())
        } else {
            ConvertError::Io(e)
        }
    })?;

    if !output.status.success() {
        return Err(ConvertError::ToolFailed {
            tool: TOOL.to_string(),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

fn font_args(font: Option<&FontSpec>) -> Vec<String> {
    match font {
        Some(font) => vec![
            "-V".to_string(),
            format!("mainfont={}", font.family),
            "-V".to_string(),
            format!("fontsize={}pt", font.size_pt),
        ],
        None => Vec::new(),
    }
}

/// The batch pipeline's render collaborator, backed by pandoc.
#[derive(Debug, Clone, Default)]
pub struct PandocRenderer {
    font: Option<FontSpec>,
}

impl PandocRenderer {
    pub fn new(font: Option<FontSpec>) -> Self {
        Self { font }
    }
}

impl Renderer for PandocRenderer {
    fn render_to_pdf(&self, docx: &Path, pdf: &Path) -> docmill_core::Result<()> {
        docx_to_pdf(docx, pdf, self.font.as_ref())
            .map_err(|e| DocmillError::Render(e.to_string()))
    }
}
