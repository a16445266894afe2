use crate::error::{Result, StegError};
use std::ops::Range;

/// Write every bit of `source[source_range]`, most significant bit first,
/// into the LSB of consecutive bytes of `target` starting at `target_range.start`.
///
/// Only the lowest bit of each touched target byte changes.
pub fn insert_bits(
    target: &mut [u8],
    target_range: Range<usize>,
    source: &[u8],
    source_range: Range<usize>,
) -> Result<()> {
    if source_range.start > source_range.end || source_range.end > source.len() {
        return Err(StegError::InsufficientBytes {
            requested: source_range.end as u64,
            available: source.len() as u64,
        });
    }

    let target_end = target_range.end.min(target.len());
    let available = target_end.saturating_sub(target_range.start);
    let needed = source_range.len() * 8;
    if needed > available {
        return Err(StegError::InsufficientMemory {
            needed: needed as u64,
            available: available as u64,
        });
    }

    let region = &mut target[target_range.start..target_range.start + needed];
    for (chunk, &byte) in region.chunks_exact_mut(8).zip(&source[source_range]) {
        for (j, cover) in chunk.iter_mut().enumerate() {
            let bit = (byte >> (7 - j)) & 1;
            *cover = (*cover & 0xFE) | bit;
        }
    }

    Ok(())
}

/// Rebuild `amount` bytes from the LSBs of `source`, eight cover bytes per
/// output byte, starting at `position`.
pub fn extract_bits(source: &[u8], position: usize, amount: usize) -> Result<Vec<u8>> {
    if amount < 1 {
        return Err(StegError::InsufficientBytes {
            requested: 0,
            available: source.len().saturating_sub(position) as u64 / 8,
        });
    }

    let needed = amount
        .checked_mul(8)
        .and_then(|bits| bits.checked_add(position))
        .filter(|&end| end <= source.len())
        .ok_or(StegError::InsufficientBytes {
            requested: amount as u64,
            available: source.len().saturating_sub(position) as u64 / 8,
        })?;

    Ok(source[position..needed]
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1)))
        .collect())
}
