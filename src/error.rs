use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("The system cannot find the {role} file specified: {}", .path.display())]
    FileNotFound { role: &'static str, path: PathBuf },

    #[error("Destination {} already exists (use --force to overwrite)", .0.display())]
    DestinationExists(PathBuf),

    /// The cover cannot hold the header and payload at the requested offset.
    #[error("Not enough space in cover file: need {needed} cover bytes, have {available}")]
    InsufficientMemory { needed: u64, available: u64 },

    /// More bytes were requested than the source contains.
    #[error("Source does not contain enough bytes: requested {requested}, available {available}")]
    InsufficientBytes { requested: u64, available: u64 },

    #[error("Invalid key: security token does not match")]
    InvalidKey,

    #[error("'{0}' file format is not yet supported")]
    UnsupportedFileFormat(String),

    #[error("Format marker not found: {0}")]
    FormatNotFound(String),

    #[error("Unsupported security type: {0}")]
    UnsupportedSecurityType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StegError>;

impl From<image::ImageError> for StegError {
    fn from(err: image::ImageError) -> Self {
        StegError::Image(err.to_string())
    }
}
