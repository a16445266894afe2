//! Numeric <-> byte conversions used by the header fields.
//!
//! Byte order is fixed big-endian (most significant byte first) so that a
//! cover written on one machine decodes identically on any other.

pub fn u32_to_bytes(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn bytes_to_u32(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

pub fn u64_to_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn bytes_to_u64(bytes: [u8; 8]) -> u64 {
    u64::from_be_bytes(bytes)
}

/// Reinterprets the IEEE-754 bits through `u32`; NaN payloads survive.
pub fn f32_to_bytes(value: f32) -> [u8; 4] {
    u32_to_bytes(value.to_bits())
}

pub fn bytes_to_f32(bytes: [u8; 4]) -> f32 {
    f32::from_bits(bytes_to_u32(bytes))
}

pub fn f64_to_bytes(value: f64) -> [u8; 8] {
    u64_to_bytes(value.to_bits())
}

pub fn bytes_to_f64(bytes: [u8; 8]) -> f64 {
    f64::from_bits(bytes_to_u64(bytes))
}
