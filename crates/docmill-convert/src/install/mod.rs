//! Managed pandoc provisioning
//!
//! Installs pandoc from GitHub Release assets into a per-user cache
//! (`<cache>/docmill/pandoc/<version>/`). Used by the docx→PDF path to
//! self-heal a missing tool: resolve fails → provision → retry once.

pub mod download;
pub mod platform;
pub mod release;

use std::fs;
use std::path::PathBuf;

use crate::error::{ConvertError, Result};

pub use platform::{binary_name, detect_arch, detect_os};
pub use release::{Asset, Release};

/// Root of the managed pandoc cache.
pub fn cache_root() -> Result<PathBuf> {
    let base = dirs::cache_dir().ok_or_else(|| {
        ConvertError::UnsupportedPlatform("no user cache directory on this platform".to_string())
    })?;
    Ok(base.join("docmill").join("pandoc"))
}

/// Most recently installed cached binary, if any.
pub fn cached_binary() -> Option<PathBuf> {
    let root = cache_root().ok()?;
    let mut versions: Vec<String> = fs::read_dir(&root)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    versions.sort();

    versions
        .into_iter()
        .rev()
        .map(|version| root.join(version).join(binary_name()))
        .find(|binary| binary.exists())
}

/// Download and install the latest pandoc release into the cache.
pub fn provision() -> Result<PathBuf> {
    let os = detect_os()?;
    let arch = detect_arch()?;

    let release = release::fetch_latest()?;
    let asset = release::select_asset(&release, os, arch)?;

    download::download_and_install(asset, release.version(), &cache_root()?)
}
