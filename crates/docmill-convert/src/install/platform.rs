use crate::error::{ConvertError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    MacOS,
    Linux,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
}

pub fn detect_os() -> Result<Os> {
    #[cfg(target_os = "macos")]
    return Ok(Os::MacOS);

    #[cfg(target_os = "linux")]
    return Ok(Os::Linux);

    #[cfg(target_os = "windows")]
    return Ok(Os::Windows);

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    Err(ConvertError::UnsupportedPlatform(format!(
        "unsupported operating system: {}",
        std::env::consts::OS
    )))
}

pub fn detect_arch() -> Result<Arch> {
    #[cfg(target_arch = "x86_64")]
    return Ok(Arch::X86_64);

    #[cfg(target_arch = "aarch64")]
    return Ok(Arch::Aarch64);

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    Err(ConvertError::UnsupportedPlatform(format!(
        "unsupported architecture: {}",
        std::env::consts::ARCH
    )))
}

/// Substring identifying the release asset for a platform, following
/// pandoc's asset naming scheme.
pub fn asset_pattern(os: Os, arch: Arch) -> Result<&'static str> {
    match (os, arch) {
        (Os::Linux, Arch::X86_64) => Ok("linux-amd64"),
        (Os::Linux, Arch::Aarch64) => Ok("linux-arm64"),
        (Os::MacOS, Arch::X86_64) => Ok("x86_64-macOS"),
        (Os::MacOS, Arch::Aarch64) => Ok("arm64-macOS"),
        (Os::Windows, Arch::X86_64) => Ok("windows-x86_64"),
        (Os::Windows, Arch::Aarch64) => Err(ConvertError::UnsupportedPlatform(
            "pandoc publishes no windows-arm64 release asset".to_string(),
        )),
    }
}

pub fn binary_name() -> &'static str {
    #[cfg(target_os = "windows")]
    return "pandoc.exe";

    #[cfg(not(target_os = "windows"))]
    return "pandoc";
}
