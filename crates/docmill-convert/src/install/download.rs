//! Asset download and extraction
//!
//! Downloads a pandoc release asset, extracts it (`.tar.gz` or `.zip`),
//! locates the binary among the extracted files (releases nest it under
//! `pandoc-<version>/bin/`), and installs it atomically into the cache.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConvertError, Result};
use crate::install::platform::binary_name;
use crate::install::release::Asset;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Download an asset and install its binary as
/// `<cache_root>/<version>/<binary_name>`.
pub fn download_and_install(asset: &Asset, version: &str, cache_root: &Path) -> Result<PathBuf> {
    let archive = download_to_temp(asset)?;

    let extract_dir = tempfile::tempdir()?;
    extract(archive.path(), &asset.name, extract_dir.path())?;

    let binary = find_binary(extract_dir.path())?;

    #[cfg(unix)]
    set_executable(&binary)?;

    let version_dir = cache_root.join(version);
    fs::create_dir_all(&version_dir)?;

    let target = version_dir.join(binary_name());
    atomic_move(&binary, &target)?;

    Ok(target)
}

fn download_to_temp(asset: &Asset) -> Result<tempfile::NamedTempFile> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("docmill")
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| ConvertError::Network(e.to_string()))?;

    let mut response = client
        .get(&asset.browser_download_url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| ConvertError::Network(e.to_string()))?;

    let mut file = tempfile::NamedTempFile::new()?;
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; 8192];

    loop {
        let read = response
            .read(&mut buffer)
            .map_err(|e| ConvertError::Network(e.to_string()))?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])?;
        downloaded += read as u64;
    }

    if downloaded != asset.size {
        return Err(ConvertError::ProvisionFailed(format!(
            "size mismatch for {}: expected {} bytes, got {downloaded}",
            asset.name, asset.size
        )));
    }

    file.as_file().sync_all()?;
    Ok(file)
}

fn extract(archive: &Path, asset_name: &str, dest: &Path) -> Result<()> {
    if asset_name.ends_with(".tar.gz") {
        let file = fs::File::open(archive)?;
        let decoder = flate2::read::GzDecoder::new(file);
        tar::Archive::new(decoder).unpack(dest).map_err(|e| {
            ConvertError::ProvisionFailed(format!("tar extraction failed: {e}"))
        })?;
        Ok(())
    } else if asset_name.ends_with(".zip") {
        let file = fs::File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file)
            .map_err(|e| ConvertError::ProvisionFailed(format!("zip open failed: {e}")))?;
        zip.extract(dest)
            .map_err(|e| ConvertError::ProvisionFailed(format!("zip extraction failed: {e}")))?;
        Ok(())
    } else {
        Err(ConvertError::ProvisionFailed(format!(
            "unsupported archive format: {asset_name}"
        )))
    }
}

/// Locate the pandoc binary among extracted files, wherever the release
/// nests it.
fn find_binary(dir: &Path) -> Result<PathBuf> {
    let wanted = binary_name();
    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && entry.file_name() == wanted {
            return Ok(entry.into_path());
        }
    }
    Err(ConvertError::ProvisionFailed(format!(
        "'{wanted}' not found in extracted archive"
    )))
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

/// Rename into place; fall back to copy-and-delete across filesystems.
fn atomic_move(source: &Path, target: &Path) -> Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, target)?;
            let _ = fs::remove_file(source);
            Ok(())
        }
        Err(e) => {
            // Older kernels and some filesystems report cross-device moves
            // as generic errors; retry with copy before giving up
            if fs::copy(source, target).is_ok() {
                let _ = fs::remove_file(source);
                return Ok(());
            }
            Err(ConvertError::Io(e))
        }
    }
}
