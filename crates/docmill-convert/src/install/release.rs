//! Pandoc release metadata from the GitHub API

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::install::platform::{asset_pattern, Arch, Os};

const LATEST_RELEASE_URL: &str = "https://api.github.com/repos/jgm/pandoc/releases/latest";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub Release metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    /// Release tag name (e.g., "3.5")
    pub tag_name: String,
    /// Downloadable assets
    pub assets: Vec<Asset>,
}

/// GitHub Release asset (downloadable file).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Asset {
    /// Asset filename (e.g., "pandoc-3.5-linux-amd64.tar.gz")
    pub name: String,
    /// Direct download URL
    pub browser_download_url: String,
    /// File size in bytes
    pub size: u64,
}

impl Release {
    pub fn version(&self) -> &str {
        self.tag_name.trim_start_matches('v')
    }
}

/// Fetch metadata for the latest pandoc release.
pub fn fetch_latest() -> Result<Release> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("docmill")
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| ConvertError::Network(e.to_string()))?;

    let response = client
        .get(LATEST_RELEASE_URL)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| ConvertError::Network(e.to_string()))?;

    response
        .json()
        .map_err(|e| ConvertError::Network(format!("invalid release metadata: {e}")))
}

/// Pick the installable archive asset for a platform.
pub fn select_asset<'a>(release: &'a Release, os: Os, arch: Arch) -> Result<&'a Asset> {
    let pattern = asset_pattern(os, arch)?;

    release
        .assets
        .iter()
        .filter(|asset| asset.name.ends_with(".tar.gz") || asset.name.ends_with(".zip"))
        .find(|asset| asset.name.contains(pattern))
        .ok_or_else(|| {
            ConvertError::ProvisionFailed(format!(
                "release {} has no asset matching '{pattern}'",
                release.tag_name
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release() -> Release {
        serde_json::from_str(
            r#"{
                "tag_name": "3.5",
                "assets": [
                    {
                        "name": "pandoc-3.5-linux-amd64.tar.gz",
                        "browser_download_url": "https://example.com/linux.tar.gz",
                        "size": 100
                    },
                    {
                        "name": "pandoc-3.5-arm64-macOS.zip",
                        "browser_download_url": "https://example.com/mac.zip",
                        "size": 200
                    },
                    {
                        "name": "pandoc-3.5-linux-amd64.deb",
                        "browser_download_url": "https://example.com/linux.deb",
                        "size": 300
                    }
                ]
            }"#,
        )
        .expect("release fixture")
    }

    #[test]
    fn deserializes_github_metadata() {
        let release = release();
        assert_eq!(release.version(), "3.5");
        assert_eq!(release.assets.len(), 3);
    }

    #[test]
    fn selects_archive_asset_for_platform() {
        let release = release();
        let asset = select_asset(&release, Os::Linux, Arch::X86_64).unwrap();
        assert_eq!(asset.name, "pandoc-3.5-linux-amd64.tar.gz");

        let asset = select_asset(&release, Os::MacOS, Arch::Aarch64).unwrap();
        assert_eq!(asset.name, "pandoc-3.5-arm64-macOS.zip");
    }

    #[test]
    fn non_archive_assets_are_skipped() {
        // The .deb must not win even though it matches the pattern
        let mut release = release();
        release.assets.remove(0);
        assert!(select_asset(&release, Os::Linux, Arch::X86_64).is_err());
    }

    #[test]
    fn missing_platform_asset_is_an_error() {
        let release = release();
        assert!(select_asset(&release, Os::Windows, Arch::X86_64).is_err());
    }
}
