//! COBS framing for byte-oriented links.
//!
//! This crate implements Consistent Overhead Byte Stuffing as a pair of
//! incremental state machines. The encoder turns an arbitrary payload into a
//! frame in which `0x00` appears exactly once, as the terminating delimiter;
//! the decoder consumes such frames one byte (or one chunk) at a time and
//! recovers the payload, detecting malformed input and output exhaustion.
//!
//! ## Features
//!
//! - **Incremental Encoding**: feed a payload in arbitrary chunks, output is identical
//! - **Streaming Decoding**: byte-at-a-time or chunked, with latched terminal statuses
//! - **Fixed Buffers**: capacity is set once, nothing grows on the hot path
//! - **Exact Sizing**: [`max_encode_len`] / [`max_decode_len`] size buffers up front
//!
//! ## Wire Format
//!
//! ```text
//! +------+---------------------+------+---------------------+-----+------+
//! | code | code-1 data bytes   | code | code-1 data bytes   | ... | 0x00 |
//! +------+---------------------+------+---------------------+-----+------+
//! ```
//!
//! A code below `0xFF` implies a zero byte after its run (except for the
//! last run of the frame); `0xFF` marks a full 254-byte run with no implied
//! zero.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod status;

// Re-export main types
pub use decoder::{decode, decode_into, max_decode_len, CobsDecoder};
pub use encoder::{encode, encode_into, max_encode_len, CobsEncoder};
pub use error::CobsError;
pub use status::{DecodeStatus, Status};

/// The frame delimiter, never present inside an encoded frame.
pub const DELIMITER: u8 = 0x00;

/// Longest run of non-zero bytes a single code byte can describe.
pub const MAX_RUN: usize = 254;

#[cfg(test)]
mod test_vectors;
