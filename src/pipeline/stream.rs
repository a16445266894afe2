use crate::capacity::check_extractable;
use crate::config::StegConfig;
use crate::error::{Result, StegError};
use crate::header::{header_len, SecurityToken, BITS_PER_BYTE};
use crate::pipeline::bits::{extract_bits, insert_bits};
use crate::pipeline::frame::{decode_header, encode_header};
use log::debug;
use sha2::{Digest, Sha256};
use std::io::{self, Read, Write};

/// Outcome of one embed or extract pass
#[derive(Debug, Clone)]
pub struct TransferStats {
    /// Payload length recorded in the header
    pub payload_bytes: u64,
    /// Cover bytes written (embed) or consumed (extract), preamble included
    pub cover_bytes: u64,
    /// Header size in cover bytes
    pub header_bits: u64,
    /// Hex SHA-256 of the payload as embedded or recovered
    pub payload_sha256: String,
}

/// Read until `buf` is full or the reader is exhausted.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Copy `cover` to `out`, hiding `payload` after the first `preamble` bytes.
///
/// Capacity must already have been validated; a cover that runs out early is
/// still reported as `InsufficientMemory` rather than producing a truncated
/// embedding. Every cover byte after the payload is copied unchanged.
pub fn embed_stream<R: Read, P: Read, W: Write>(
    cover: &mut R,
    payload: &mut P,
    payload_len: u64,
    out: &mut W,
    token: &SecurityToken,
    preamble: u64,
    config: &StegConfig,
) -> Result<TransferStats> {
    // SkipPreamble
    let copied = io::copy(&mut cover.by_ref().take(preamble), out)?;
    if copied < preamble {
        return Err(StegError::InsufficientMemory {
            needed: preamble,
            available: copied,
        });
    }
    debug!("copied {} preamble bytes", copied);

    // Header
    let header = encode_header(cover, out, token, payload_len)?;
    let mut cover_bytes = copied + header.header_bits();

    // BulkTransfer
    let mut cover_buf = vec![0u8; config.cover_chunk()];
    let mut payload_buf = vec![0u8; config.payload_chunk()];
    let mut remaining = payload_len;
    let mut hasher = Sha256::new();

    loop {
        let read = read_full(cover, &mut cover_buf)?;
        if read == 0 {
            break;
        }

        if remaining > 0 {
            let take = remaining
                .min((read / 8) as u64)
                .min(payload_buf.len() as u64) as usize;
            payload.read_exact(&mut payload_buf[..take])?;
            insert_bits(&mut cover_buf[..read], 0..read, &payload_buf[..take], 0..take)?;
            hasher.update(&payload_buf[..take]);
            remaining -= take as u64;
        }

        out.write_all(&cover_buf[..read])?;
        cover_bytes += read as u64;
    }

    if remaining > 0 {
        return Err(StegError::InsufficientMemory {
            needed: remaining * BITS_PER_BYTE,
            available: 0,
        });
    }

    out.flush()?;
    debug!(
        "embedded {} payload bytes into {} cover bytes",
        payload_len, cover_bytes
    );

    Ok(TransferStats {
        payload_bytes: payload_len,
        cover_bytes,
        header_bits: header.header_bits(),
        payload_sha256: hex::encode(hasher.finalize()),
    })
}

/// Recover the payload hidden in `cover` after `preamble` bytes.
///
/// `region` is the number of embeddable cover bytes following the preamble;
/// a declared payload that would not fit in it fails with
/// `InsufficientBytes` before anything is written to `out`.
pub fn extract_stream<R: Read, W: Write>(
    cover: &mut R,
    out: &mut W,
    token: &SecurityToken,
    preamble: u64,
    region: u64,
    config: &StegConfig,
) -> Result<TransferStats> {
    let skipped = io::copy(&mut cover.by_ref().take(preamble), &mut io::sink())?;
    if skipped < preamble {
        return Err(StegError::InsufficientBytes {
            requested: preamble,
            available: skipped,
        });
    }

    check_extractable(region, header_len(token) as u64)?;
    let header = decode_header(cover, token)?;
    let remaining_region = region - header.header_bits();
    check_extractable(remaining_region, header.length)?;
    debug!(
        "header accepted, extracting {} bytes from {} available cover bytes",
        header.length, remaining_region
    );

    let cover_chunk = config.cover_chunk();
    let mut cover_buf = vec![0u8; cover_chunk];
    let mut remaining = header.length;
    let mut cover_bytes = skipped + header.header_bits();
    let mut hasher = Sha256::new();

    while remaining > 0 {
        let take = remaining.min((cover_chunk / 8) as u64) as usize;
        let block = &mut cover_buf[..take * 8];
        let read = read_full(cover, block)?;
        if read < block.len() {
            return Err(StegError::InsufficientBytes {
                requested: remaining,
                available: read as u64 / BITS_PER_BYTE,
            });
        }

        let bytes = extract_bits(block, 0, take)?;
        hasher.update(&bytes);
        out.write_all(&bytes)?;
        cover_bytes += read as u64;
        remaining -= take as u64;
    }

    out.flush()?;

    Ok(TransferStats {
        payload_bytes: header.length,
        cover_bytes,
        header_bits: header.header_bits(),
        payload_sha256: hex::encode(hasher.finalize()),
    })
}
