//! CLI command structure using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docmill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Session store root directory
    #[arg(long, global = true, env = "DOCMILL_STORE", default_value = ".")]
    pub store: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a session from a template and a dataset
    New {
        /// Session name (becomes the directory name)
        name: String,

        /// Word template with {{name}} placeholders
        #[arg(long)]
        template: PathBuf,

        /// Dataset file (.xlsx or .csv)
        #[arg(long)]
        dataset: PathBuf,
    },

    /// List existing sessions
    List {
        #[arg(long)]
        json: bool,
    },

    /// Delete a session and all its generated outputs
    Delete {
        name: String,
    },

    /// Overwrite a session's stored template and/or dataset
    Replace {
        name: String,

        /// New template to store
        #[arg(long)]
        template: Option<PathBuf>,

        /// New dataset to store
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Show the placeholder tokens referenced by a template
    Tokens {
        /// Template file (.docx)
        template: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Generate one PDF per dataset row and package them as a zip
    Generate {
        name: String,

        /// Base name for generated files (defaults to the session name)
        #[arg(long)]
        base: Option<String>,

        /// Dataset column naming each rendered PDF
        #[arg(long)]
        filename_column: String,

        /// Main font passed to the PDF engine
        #[arg(long)]
        font: Option<String>,

        /// Font size in points (used with --font)
        #[arg(long, default_value_t = 12)]
        font_size: u32,

        /// Archive output path (defaults to <name>.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Package a session's previously generated PDFs without regenerating
    Download {
        name: String,

        /// Archive output path (defaults to <name>.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// One-shot format conversions
    #[command(subcommand)]
    Convert(ConvertCommands),
}

#[derive(Subcommand)]
pub enum ConvertCommands {
    /// Convert a DOCX file to PDF
    DocxToPdf {
        input: PathBuf,

        /// Output path (defaults to the input with a .pdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a PDF file to DOCX
    PdfToDocx {
        input: PathBuf,

        /// Output path (defaults to the input with a .docx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
