//! CRC configuration error types.

use thiserror::Error;

/// CRC configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrcError {
    /// Bit width not supported by the operation
    #[error("unsupported crc width: {0} bits")]
    Width(u32),

    /// Profile width differs from the requested width
    #[error("profile is {actual} bits wide, {requested} requested")]
    WidthMismatch {
        /// Width asked for by the caller
        requested: u32,
        /// Width of the profile
        actual: u32,
    },

    /// Generator polynomial wider than the register
    #[error("polynomial {poly:#x} does not fit in {bits} bits")]
    Polynomial {
        /// Generator polynomial
        poly: u32,
        /// Register width
        bits: u32,
    },

    /// Initial value or final XOR wider than the register
    #[error("{field} {value:#x} does not fit in {bits} bits")]
    Value {
        /// Which parameter is out of range
        field: &'static str,
        /// Offending value
        value: u32,
        /// Register width
        bits: u32,
    },

    /// Profile name not in the registry
    #[error("unknown crc profile: {0}")]
    Unknown(String),
}
