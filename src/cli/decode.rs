use crate::carrier::{recover_payload, CarrierReport};
use crate::config::StegConfig;
use crate::container::ContainerKind;
use crate::error::{Result, StegError};
use crate::header::SecurityToken;
use std::path::Path;

/// Options for the decode command
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub token: SecurityToken,
    pub config: StegConfig,
    pub format: Option<ContainerKind>,
    pub force: bool,
}

/// Recover the payload hidden in `cover_path` into `output_path`
pub fn decode_file(
    cover_path: &Path,
    output_path: &Path,
    options: &DecodeOptions,
) -> Result<CarrierReport> {
    if output_path.exists() && !options.force {
        return Err(StegError::DestinationExists(output_path.to_path_buf()));
    }

    recover_payload(
        cover_path,
        output_path,
        &options.token,
        &options.config,
        options.format,
    )
}
