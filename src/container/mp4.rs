use super::{ContainerKind, FormatDescriptor};
use crate::error::{Result, StegError};
use log::warn;
use std::io::{Read, Seek, SeekFrom};

const MDAT: &[u8; 4] = b"mdat";
const SCAN_BUFFER_SIZE: usize = 1024 * 1024;

/// Location of an `mdat` atom found by a linear scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdatAtom {
    /// Absolute position of the `mdat` type marker
    pub marker_position: u64,
    /// First byte of the atom body (after the type, and after the 64-bit
    /// size when the atom uses one)
    pub body_start: u64,
    /// Body length, clamped to the file
    pub body_len: u64,
}

/// Scan for the first `mdat` marker preceded by a usable size field.
///
/// Size `1` means a 64-bit size follows the marker; size `0` means the atom
/// runs to the end of the file. Sizes too small to cover the atom header are
/// treated as a coincidental byte match and scanning continues.
pub fn find_mdat<R: Read + Seek>(reader: &mut R, file_len: u64) -> Result<Option<MdatAtom>> {
    reader.seek(SeekFrom::Start(0))?;

    // Last 8 bytes seen: [size: 4][type: 4]
    let mut window = [0u8; 8];
    let mut seen: u64 = 0;
    let mut buf = vec![0u8; SCAN_BUFFER_SIZE];

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        for (i, &byte) in buf[..read].iter().enumerate() {
            window.rotate_left(1);
            window[7] = byte;
            seen += 1;

            if seen < 8 || &window[4..8] != MDAT {
                continue;
            }

            let marker_position = seen - 4;
            let size = u32::from_be_bytes([window[0], window[1], window[2], window[3]]);
            let atom_start = marker_position - 4;

            let (body_start, declared_end) = match size {
                0 => (marker_position + 4, file_len),
                1 => {
                    let resume = seen + (read - i - 1) as u64;
                    let large = read_large_size(reader, marker_position + 4)?;
                    reader.seek(SeekFrom::Start(resume))?;
                    match large {
                        Some(large) if large >= 16 => {
                            (marker_position + 12, atom_start.saturating_add(large))
                        }
                        _ => continue,
                    }
                }
                2..=7 => continue,
                _ => (marker_position + 4, atom_start + size as u64),
            };

            let end = if declared_end > file_len {
                warn!(
                    "mdat atom at {} declares {} bytes past end of file, clamping",
                    atom_start,
                    declared_end - file_len
                );
                file_len
            } else {
                declared_end
            };

            return Ok(Some(MdatAtom {
                marker_position,
                body_start,
                body_len: end.saturating_sub(body_start),
            }));
        }
    }
}

fn read_large_size<R: Read + Seek>(reader: &mut R, position: u64) -> Result<Option<u64>> {
    reader.seek(SeekFrom::Start(position))?;
    let mut bytes = [0u8; 8];
    match reader.read_exact(&mut bytes) {
        Ok(()) => Ok(Some(u64::from_be_bytes(bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Region inside the first `mdat` atom body.
pub fn locate_mp4<R: Read + Seek>(reader: &mut R, file_len: u64) -> Result<FormatDescriptor> {
    let atom = find_mdat(reader, file_len)?
        .ok_or_else(|| StegError::FormatNotFound("mdat atom".into()))?;

    Ok(FormatDescriptor {
        kind: ContainerKind::Mp4,
        start_offset: atom.body_start,
        capacity_bytes: atom.body_len,
    })
}
