use super::{ContainerKind, FormatDescriptor};
use crate::error::{Result, StegError};
use crate::pipeline::stream::read_full;
use std::io::Read;

/// Canonical PCM WAV header size; everything after it is sample data.
pub const WAV_HEADER_SIZE: u64 = 44;

/// Region after the fixed 44-byte header.
///
/// The header is not parsed; only the `RIFF`/`WAVE` magic is checked, and only
/// when the file is long enough to carry it.
pub fn locate_wav<R: Read>(reader: &mut R, file_len: u64) -> Result<FormatDescriptor> {
    let mut magic = [0u8; 12];
    let read = read_full(reader, &mut magic)?;
    if read == magic.len() && (&magic[0..4] != b"RIFF" || &magic[8..12] != b"WAVE") {
        return Err(StegError::FormatNotFound("RIFF/WAVE header".into()));
    }

    Ok(FormatDescriptor {
        kind: ContainerKind::Wav,
        start_offset: WAV_HEADER_SIZE,
        capacity_bytes: file_len.saturating_sub(WAV_HEADER_SIZE),
    })
}
