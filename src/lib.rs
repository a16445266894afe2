//! Stegbit - least-significant-bit steganography for ordinary files
//!
//! A payload file is hidden in the low bit of consecutive bytes of a cover
//! file: PNG rasters, WAV sample data, the `mdat` atom of MP4 files, or the
//! raw bytes of any file treated as a generic document. The output looks like
//! the cover and keeps its size and format.
//!
//! ## Embedded Layout
//!
//! Inside the embeddable region, after an optional caller-chosen offset:
//!
//! ```text
//! [security token][payload length: u64 BE][payload bytes...]
//! ```
//!
//! Every hidden byte occupies 8 cover bytes, most significant bit first.
//! The token is an int, long, float, double or length-prefixed password; it
//! gates decoding but does not encrypt anything.
//!
//! ## Example
//!
//! ```no_run
//! use stegbit::cli::{decode_file, encode_file, DecodeOptions, EncodeOptions};
//! use stegbit::SecurityToken;
//! use std::path::Path;
//!
//! let token = SecurityToken::Int(42);
//!
//! encode_file(
//!     Path::new("cover.wav"),
//!     Path::new("secret.txt"),
//!     Path::new("carrier.wav"),
//!     &EncodeOptions { token: token.clone(), ..Default::default() },
//! ).unwrap();
//!
//! decode_file(
//!     Path::new("carrier.wav"),
//!     Path::new("recovered.txt"),
//!     &DecodeOptions { token, ..Default::default() },
//! ).unwrap();
//! ```

pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod config;
pub mod container;
pub mod error;
pub mod header;
pub mod pipeline;

pub use capacity::CapacityAnalysis;
pub use carrier::{analyze_cover, decode, encode, hide_payload, recover_payload, CarrierReport};
pub use config::StegConfig;
pub use container::{locate, ContainerKind, FormatDescriptor};
pub use error::{Result, StegError};
pub use header::{PayloadHeader, SecurityToken, TokenKind};
