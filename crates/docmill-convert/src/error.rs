use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("TOOL_NOT_FOUND: '{0}' is not installed and could not be resolved")]
    ToolNotFound(String),

    #[error("TOOL_FAILED: {tool} exited with status {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("PROVISION_FAILED: {0}")]
    ProvisionFailed(String),

    #[error("NETWORK_FETCH_FAILED: {0}")]
    Network(String),

    #[error("UNSUPPORTED_PLATFORM: {0}")]
    UnsupportedPlatform(String),

    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
