use crate::error::{Result, StegError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cover buffer: 1 MiB
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Smallest usable cover buffer (one hidden byte)
pub const MIN_BUFFER_CAPACITY: usize = 8;

/// Pipeline tunables, forwarded unchanged into every encode/decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct StegConfig {
    /// Cover bytes read per bulk-transfer iteration
    pub buffer_capacity: usize,
    /// Extra cover bytes left untouched after the format preamble
    pub offset: u32,
}

impl Default for StegConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            offset: 0,
        }
    }
}

/// Signed on-disk form, so that negative values are rejected rather than
/// failing with an opaque parse error.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_buffer_capacity")]
    buffer_capacity: i64,
    #[serde(default)]
    offset: i64,
}

fn default_buffer_capacity() -> i64 {
    DEFAULT_BUFFER_CAPACITY as i64
}

impl TryFrom<RawConfig> for StegConfig {
    type Error = StegError;
    fn try_from(raw: RawConfig) -> Result<Self> {
        let config = StegConfig::default()
            .with_offset(raw.offset)?
            .with_buffer_capacity(raw.buffer_capacity)?;
        Ok(config)
    }
}

impl StegConfig {
    /// Load persisted preferences from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Save preferences as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    pub fn with_offset(mut self, offset: i64) -> Result<Self> {
        self.offset = u32::try_from(offset).map_err(|_| {
            StegError::InvalidConfig(format!(
                "offset must be between 0 and {}, got {}",
                u32::MAX,
                offset
            ))
        })?;
        Ok(self)
    }

    pub fn with_buffer_capacity(mut self, capacity: i64) -> Result<Self> {
        match usize::try_from(capacity) {
            Ok(capacity) if capacity >= MIN_BUFFER_CAPACITY => {
                self.buffer_capacity = capacity;
                Ok(self)
            }
            _ => Err(StegError::InvalidConfig(format!(
                "buffer capacity must be at least {} bytes, got {}",
                MIN_BUFFER_CAPACITY, capacity
            ))),
        }
    }

    /// Cover buffer rounded down to whole hidden bytes
    pub fn cover_chunk(&self) -> usize {
        (self.buffer_capacity / 8 * 8).max(MIN_BUFFER_CAPACITY)
    }

    /// Payload bytes consumed per cover buffer; always `cover_chunk / 8`
    pub fn payload_chunk(&self) -> usize {
        self.cover_chunk() / 8
    }
}
