use crate::error::{Result, StegError};
use crate::header::{PayloadHeader, SecurityToken, LENGTH_SIZE_BYTES, PASSWORD_PREFIX_BYTES};
use crate::pipeline::bits::{extract_bits, insert_bits};
use crate::pipeline::convert::{bytes_to_u64, u64_to_bytes};
use crate::pipeline::stream::read_full;
use std::io::{Read, Write};

/// Embed the header (token, then payload length) into freshly read cover
/// bytes and write them straight to `out`.
///
/// Each field is expanded 8x: one cover byte per header bit.
pub fn encode_header<R: Read, W: Write>(
    cover: &mut R,
    out: &mut W,
    token: &SecurityToken,
    payload_len: u64,
) -> Result<PayloadHeader> {
    let header = PayloadHeader::new(token, payload_len);

    embed_field(cover, out, &header.token_bytes)?;
    embed_field(cover, out, &u64_to_bytes(header.length))?;
    out.flush()?;

    Ok(header)
}

/// Read the header back and check it against `token`.
///
/// Fails with `InvalidKey` as soon as the embedded token bytes differ from the
/// canonical form of `token`; a password whose declared length differs is
/// rejected before its body is read.
pub fn decode_header<R: Read>(cover: &mut R, token: &SecurityToken) -> Result<PayloadHeader> {
    let expected = token.to_bytes();

    match token {
        SecurityToken::Password(password) => {
            let prefix = extract_field(cover, PASSWORD_PREFIX_BYTES)?;
            if prefix[..] != expected[..PASSWORD_PREFIX_BYTES] {
                return Err(StegError::InvalidKey);
            }
            if !password.is_empty() {
                let body = extract_field(cover, password.len())?;
                if body[..] != expected[PASSWORD_PREFIX_BYTES..] {
                    return Err(StegError::InvalidKey);
                }
            }
        }
        SecurityToken::Int(_)
        | SecurityToken::Long(_)
        | SecurityToken::Float(_)
        | SecurityToken::Double(_) => {
            let found = extract_field(cover, expected.len())?;
            if found != expected {
                return Err(StegError::InvalidKey);
            }
        }
    }

    let length_field = extract_field(cover, LENGTH_SIZE_BYTES)?;
    let mut length_bytes = [0u8; LENGTH_SIZE_BYTES];
    length_bytes.copy_from_slice(&length_field);

    Ok(PayloadHeader {
        token_bytes: expected,
        length: bytes_to_u64(length_bytes),
    })
}

fn embed_field<R: Read, W: Write>(cover: &mut R, out: &mut W, field: &[u8]) -> Result<()> {
    let mut block = vec![0u8; field.len() * 8];
    let read = read_full(cover, &mut block)?;
    if read < block.len() {
        return Err(StegError::InsufficientMemory {
            needed: block.len() as u64,
            available: read as u64,
        });
    }

    let len = block.len();
    insert_bits(&mut block, 0..len, field, 0..field.len())?;
    out.write_all(&block)?;
    Ok(())
}

fn extract_field<R: Read>(cover: &mut R, amount: usize) -> Result<Vec<u8>> {
    let mut block = vec![0u8; amount * 8];
    let read = read_full(cover, &mut block)?;
    if read < block.len() {
        return Err(StegError::InsufficientBytes {
            requested: amount as u64,
            available: read as u64 / 8,
        });
    }
    extract_bits(&block, 0, amount)
}
