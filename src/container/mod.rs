//! Container locators: decide where in a cover file bits may be hidden.
//!
//! - **Generic**: the whole file, from byte 0
//! - **Wav**: everything after the fixed 44-byte RIFF header
//! - **Mp4**: the body of the first `mdat` atom
//! - **Png**: the decoded RGB raster (3 bytes per pixel), not the file bytes

pub mod mp4;
pub mod png;
pub mod wav;

use crate::error::{Result, StegError};
use log::debug;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use mp4::{find_mdat, MdatAtom};
pub use png::PngRaster;
pub use wav::WAV_HEADER_SIZE;

/// Supported cover container kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Generic,
    Wav,
    Mp4,
    Png,
}

impl ContainerKind {
    /// Dispatch on the lower-cased file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => Ok(Self::Png),
            "wav" => Ok(Self::Wav),
            "mp4" => Ok(Self::Mp4),
            "txt" => Ok(Self::Generic),
            _ => Err(StegError::UnsupportedFileFormat(extension)),
        }
    }

    /// Explicit override wins over the extension
    pub fn resolve(path: &Path, explicit: Option<Self>) -> Result<Self> {
        match explicit {
            Some(kind) => Ok(kind),
            None => Self::from_path(path),
        }
    }

    /// PNG is rewritten through its decoded raster; the rest are streamed.
    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Png)
    }
}

impl std::str::FromStr for ContainerKind {
    type Err = StegError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "generic" | "document" | "txt" => Ok(Self::Generic),
            "wav" | "audio" => Ok(Self::Wav),
            "mp4" | "video" => Ok(Self::Mp4),
            "png" | "image" => Ok(Self::Png),
            _ => Err(StegError::UnsupportedFileFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generic => "generic",
            Self::Wav => "wav",
            Self::Mp4 => "mp4",
            Self::Png => "png",
        };
        f.write_str(name)
    }
}

/// Where embedding may begin and how many cover bytes follow.
///
/// For PNG both values are relative to the decoded raster; for every other
/// kind they are absolute file positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub kind: ContainerKind,
    pub start_offset: u64,
    pub capacity_bytes: u64,
}

impl FormatDescriptor {
    /// One past the last cover byte that may be modified
    pub fn end_offset(&self) -> u64 {
        self.start_offset + self.capacity_bytes
    }
}

/// Scan `path` once and describe its embeddable region.
pub fn locate(path: &Path, kind: ContainerKind) -> Result<FormatDescriptor> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let descriptor = match kind {
        ContainerKind::Generic => FormatDescriptor {
            kind,
            start_offset: 0,
            capacity_bytes: file_len,
        },
        ContainerKind::Wav => wav::locate_wav(&mut reader, file_len)?,
        ContainerKind::Mp4 => mp4::locate_mp4(&mut reader, file_len)?,
        ContainerKind::Png => png::locate_png(&mut reader)?,
    };

    debug!(
        "{}: {} region starts at {} with {} cover bytes",
        path.display(),
        descriptor.kind,
        descriptor.start_offset,
        descriptor.capacity_bytes
    );
    Ok(descriptor)
}
