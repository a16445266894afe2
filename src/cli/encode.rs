use crate::carrier::{hide_payload, CarrierReport};
use crate::config::StegConfig;
use crate::container::ContainerKind;
use crate::error::{Result, StegError};
use crate::header::SecurityToken;
use std::path::Path;

/// Options for the encode command
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub token: SecurityToken,
    pub config: StegConfig,
    /// Overrides extension-based format detection
    pub format: Option<ContainerKind>,
    /// Replace an existing output file
    pub force: bool,
}

/// Hide `payload_path` in `cover_path` and write the carrier to `output_path`
pub fn encode_file(
    cover_path: &Path,
    payload_path: &Path,
    output_path: &Path,
    options: &EncodeOptions,
) -> Result<CarrierReport> {
    if output_path.exists() && !options.force {
        return Err(StegError::DestinationExists(output_path.to_path_buf()));
    }

    hide_payload(
        cover_path,
        payload_path,
        output_path,
        &options.token,
        &options.config,
        options.format,
    )
}
