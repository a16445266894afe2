use crate::error::{Result, StegError};
use crate::pipeline::convert::{f32_to_bytes, f64_to_bytes, u32_to_bytes, u64_to_bytes};
use std::fmt;

/// Size of the embedded payload length field in bytes.
pub const LENGTH_SIZE_BYTES: usize = 8;

/// Size of the password length prefix in bytes.
pub const PASSWORD_PREFIX_BYTES: usize = 4;

/// Every hidden byte occupies the LSBs of this many cover bytes.
pub const BITS_PER_BYTE: u64 = 8;

/// Security token variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    #[default]
    Int,
    Long,
    Float,
    Double,
    Password,
}

impl std::str::FromStr for TokenKind {
    type Err = StegError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "long" => Ok(Self::Long),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "password" | "string" => Ok(Self::Password),
            _ => Err(StegError::UnsupportedSecurityType(s.to_string())),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Password => "password",
        };
        f.write_str(name)
    }
}

/// Key or password gating extraction of a hidden payload.
///
/// The token is not a secret in the cryptographic sense: its canonical bytes
/// are stored in the cover and compared on decode.
#[derive(Debug, Clone)]
pub enum SecurityToken {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Password(String),
}

impl SecurityToken {
    /// Build a token of `kind` from its textual form.
    pub fn parse(kind: TokenKind, text: &str) -> Result<Self> {
        let invalid = |reason: &dyn fmt::Display| {
            StegError::UnsupportedSecurityType(format!(
                "'{}' is not a valid {} key: {}",
                text, kind, reason
            ))
        };
        let trimmed = text.trim();
        Ok(match kind {
            TokenKind::Int => Self::Int(trimmed.parse().map_err(|e| invalid(&e))?),
            TokenKind::Long => Self::Long(trimmed.parse().map_err(|e| invalid(&e))?),
            TokenKind::Float => Self::Float(trimmed.parse().map_err(|e| invalid(&e))?),
            TokenKind::Double => Self::Double(trimmed.parse().map_err(|e| invalid(&e))?),
            TokenKind::Password => Self::Password(text.to_string()),
        })
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Int(_) => TokenKind::Int,
            Self::Long(_) => TokenKind::Long,
            Self::Float(_) => TokenKind::Float,
            Self::Double(_) => TokenKind::Double,
            Self::Password(_) => TokenKind::Password,
        }
    }

    /// Canonical big-endian byte form, as embedded in the cover.
    /// Passwords are prefixed with their 4-byte UTF-8 length.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Int(v) => u32_to_bytes(*v as u32).to_vec(),
            Self::Long(v) => u64_to_bytes(*v as u64).to_vec(),
            Self::Float(v) => f32_to_bytes(*v).to_vec(),
            Self::Double(v) => f64_to_bytes(*v).to_vec(),
            Self::Password(p) => {
                let mut buf = Vec::with_capacity(PASSWORD_PREFIX_BYTES + p.len());
                buf.extend_from_slice(&u32_to_bytes(p.len() as u32));
                buf.extend_from_slice(p.as_bytes());
                buf
            }
        }
    }

    /// Number of bytes the token occupies before LSB expansion.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Int(_) | Self::Float(_) => 4,
            Self::Long(_) | Self::Double(_) => 8,
            Self::Password(p) => PASSWORD_PREFIX_BYTES + p.len(),
        }
    }
}

impl Default for SecurityToken {
    fn default() -> Self {
        Self::Int(0)
    }
}

// Floats compare by bit pattern so that NaN keys round-trip.
impl PartialEq for SecurityToken {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.to_bytes() == other.to_bytes()
    }
}

impl Eq for SecurityToken {}

/// Fixed-layout header written at the start of the embeddable region.
/// Layout: [token bytes][length: 8 bytes big-endian]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadHeader {
    pub token_bytes: Vec<u8>,
    pub length: u64,
}

impl PayloadHeader {
    pub fn new(token: &SecurityToken, length: u64) -> Self {
        Self {
            token_bytes: token.to_bytes(),
            length,
        }
    }

    /// Header size in bytes (before LSB expansion)
    pub fn encoded_len(&self) -> usize {
        self.token_bytes.len() + LENGTH_SIZE_BYTES
    }

    /// Header size in cover bytes, i.e. bits
    pub fn header_bits(&self) -> u64 {
        self.encoded_len() as u64 * BITS_PER_BYTE
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.token_bytes);
        buf.extend_from_slice(&u64_to_bytes(self.length));
        buf
    }
}

/// Header overhead for a token, in bytes before expansion.
pub fn header_len(token: &SecurityToken) -> usize {
    token.encoded_len() + LENGTH_SIZE_BYTES
}
