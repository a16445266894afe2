use crate::container::{ContainerKind, FormatDescriptor};
use crate::error::{Result, StegError};
use crate::header::{header_len, SecurityToken, BITS_PER_BYTE};

/// Cover bytes consumed by `offset` skipped bytes plus an 8x-expanded header
/// and payload. `None` on overflow.
pub fn required_cover_bytes(offset: u64, header_bytes: u64, payload_bytes: u64) -> Option<u64> {
    header_bytes
        .checked_add(payload_bytes)?
        .checked_mul(BITS_PER_BYTE)?
        .checked_add(offset)
}

/// Encode precondition: the region must hold offset + header + payload bits.
/// Evaluated once, before the destination is created.
pub fn check_capacity(
    descriptor: &FormatDescriptor,
    offset: u64,
    header_bytes: u64,
    payload_bytes: u64,
) -> Result<()> {
    let available = descriptor.capacity_bytes;
    match required_cover_bytes(offset, header_bytes, payload_bytes) {
        Some(needed) if needed <= available => Ok(()),
        needed => Err(StegError::InsufficientMemory {
            needed: needed.unwrap_or(u64::MAX),
            available,
        }),
    }
}

/// Decode precondition: `available_cover_bytes` must carry `requested_bytes`
/// hidden bytes.
pub fn check_extractable(available_cover_bytes: u64, requested_bytes: u64) -> Result<()> {
    match requested_bytes.checked_mul(BITS_PER_BYTE) {
        Some(bits) if bits <= available_cover_bytes => Ok(()),
        _ => Err(StegError::InsufficientBytes {
            requested: requested_bytes,
            available: available_cover_bytes / BITS_PER_BYTE,
        }),
    }
}

/// How a cover's embeddable region maps to payload capacity
#[derive(Debug, Clone)]
pub struct CapacityAnalysis {
    pub kind: ContainerKind,
    pub start_offset: u64,
    pub region_bytes: u64,
    pub offset: u64,
    pub header_bytes: u64,
    pub max_payload_bytes: u64,
}

impl CapacityAnalysis {
    pub fn fits(&self, payload_bytes: u64) -> bool {
        payload_bytes <= self.max_payload_bytes
    }

    pub fn headroom_bytes(&self, payload_bytes: u64) -> u64 {
        self.max_payload_bytes.saturating_sub(payload_bytes)
    }
}

/// Analyze a located region for a specific token and offset
pub fn analyze_region(
    descriptor: &FormatDescriptor,
    offset: u64,
    token: &SecurityToken,
) -> CapacityAnalysis {
    let header_bytes = header_len(token) as u64;
    let usable = descriptor.capacity_bytes.saturating_sub(offset) / BITS_PER_BYTE;

    CapacityAnalysis {
        kind: descriptor.kind,
        start_offset: descriptor.start_offset,
        region_bytes: descriptor.capacity_bytes,
        offset,
        header_bytes,
        max_payload_bytes: usable.saturating_sub(header_bytes),
    }
}
