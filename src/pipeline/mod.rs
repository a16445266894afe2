//! LSB transfer pipeline
//!
//! `bits` works on in-memory slices, `frame` writes and checks the payload
//! header, and `stream` drives chunked transfers over arbitrary readers and
//! writers.

pub mod bits;
pub mod convert;
pub mod frame;
pub mod stream;

pub use bits::{extract_bits, insert_bits};
pub use frame::{decode_header, encode_header};
pub use stream::{embed_stream, extract_stream, TransferStats};
