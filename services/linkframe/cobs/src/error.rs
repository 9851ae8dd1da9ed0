//! COBS codec error types.

use thiserror::Error;

/// Hard failures of the COBS codec.
///
/// Malformed, overflowed, and incomplete frames are not errors; they are
/// reported through [`crate::Status`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CobsError {
    /// Output buffer too small for the worst-case encoding of the payload
    #[error("encode capacity exceeded: {required} bytes required, buffer holds {capacity}")]
    Capacity {
        /// Worst-case encoded length of everything supplied so far
        required: usize,
        /// Capacity of the output buffer
        capacity: usize,
    },

    /// Unknown numeric status code
    #[error("unknown status {0}")]
    Status(u8),
}
