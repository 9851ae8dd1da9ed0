//! CRC profiles: a lookup table plus the parameters that complete an algorithm.

use crate::table::{crc_table, generate, mask, CrcTable};
use crate::CrcError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

/// Register widths a profile can be built for
pub const SUPPORTED_WIDTHS: [u32; 3] = [8, 16, 32];

/// Parameters of a CRC algorithm, in catalogue notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrcParams {
    /// Register width in bits
    pub bits: u32,
    /// Generator polynomial, MSB-first, without the implicit top bit
    pub poly: u32,
    /// Initial register value
    #[serde(default)]
    pub init: u32,
    /// Value XORed into the register to produce the checksum
    #[serde(default)]
    pub xorout: u32,
    /// Reflected input and output
    #[serde(default)]
    pub lsb_first: bool,
}

impl CrcParams {
    /// Create a parameter set
    pub const fn new(bits: u32, poly: u32, init: u32, xorout: u32, lsb_first: bool) -> Self {
        Self {
            bits,
            poly,
            init,
            xorout,
            lsb_first,
        }
    }
}

/// Immutable description of one CRC algorithm, ready for table-driven use.
///
/// Profiles are never mutated by the engine and can be shared freely between
/// threads and computations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrcProfile {
    width: u32,
    table: CrcTable,
    initial: u32,
    final_xor: u32,
    lsb_first: bool,
}

impl CrcProfile {
    /// Assemble a profile from a prebuilt table.
    pub fn new(
        width: u32,
        table: CrcTable,
        initial: u32,
        final_xor: u32,
        lsb_first: bool,
    ) -> Result<Self, CrcError> {
        check_width(width)?;
        check_value("initial value", initial, width)?;
        check_value("final xor", final_xor, width)?;
        if let Some(&entry) = table.iter().find(|&&entry| entry & !mask(width) != 0) {
            return Err(CrcError::Value {
                field: "table entry",
                value: entry,
                bits: width,
            });
        }

        Ok(Self {
            width,
            table,
            initial,
            final_xor,
            lsb_first,
        })
    }

    /// Build the table for `params` and wrap it in a profile.
    pub fn build(params: &CrcParams) -> Result<Self, CrcError> {
        check_width(params.bits)?;
        let table = crc_table(params.bits, params.poly, params.lsb_first)?;
        debug!(
            "Built CRC-{} table for polynomial {:#x} (lsb_first: {})",
            params.bits, params.poly, params.lsb_first
        );
        Self::new(
            params.bits,
            table,
            params.init,
            params.xorout,
            params.lsb_first,
        )
    }

    /// Compile-time construction for parameters known to be valid.
    pub(crate) const fn from_params(params: CrcParams) -> Self {
        Self {
            width: params.bits,
            table: generate(params.bits, params.poly, params.lsb_first),
            initial: params.init,
            final_xor: params.xorout,
            lsb_first: params.lsb_first,
        }
    }

    /// Register width in bits
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The 256-entry lookup table
    pub fn table(&self) -> &CrcTable {
        &self.table
    }

    /// Initial register value
    pub fn initial(&self) -> u32 {
        self.initial
    }

    /// Value XORed into the register to produce the checksum
    pub fn final_xor(&self) -> u32 {
        self.final_xor
    }

    /// Whether input and output are reflected
    pub fn lsb_first(&self) -> bool {
        self.lsb_first
    }

    /// Checksum size in bytes
    pub fn byte_len(&self) -> usize {
        (self.width / 8) as usize
    }

    /// Advance a raw register by one byte.
    #[inline]
    pub fn step(&self, register: u32, byte: u8) -> u32 {
        if self.lsb_first {
            let idx = (register ^ u32::from(byte)) & 0xFF;
            self.table[idx as usize] ^ (register >> 8)
        } else {
            let idx = ((register >> (self.width - 8)) ^ u32::from(byte)) & 0xFF;
            (self.table[idx as usize] ^ (register << 8)) & mask(self.width)
        }
    }

    /// Advance a raw register over `bytes`.
    pub fn fold(&self, register: u32, bytes: &[u8]) -> u32 {
        bytes
            .iter()
            .fold(register, |register, &byte| self.step(register, byte))
    }

    /// Turn a raw register into the observable checksum.
    pub fn finalize(&self, register: u32) -> u32 {
        self.final_xor ^ register
    }

    /// One-shot checksum of `bytes`.
    pub fn checksum(&self, bytes: &[u8]) -> u32 {
        self.finalize(self.fold(self.initial, bytes))
    }

    /// Big-endian encoding of a checksum, `byte_len()` bytes long.
    pub fn to_be_bytes(&self, value: u32) -> SmallVec<[u8; 4]> {
        let bytes = value.to_be_bytes();
        SmallVec::from_slice(&bytes[bytes.len() - self.byte_len()..])
    }

    /// Read a big-endian checksum of `byte_len()` bytes.
    pub fn from_be_bytes(&self, bytes: &[u8]) -> Option<u32> {
        if bytes.len() != self.byte_len() {
            return None;
        }
        Some(
            bytes
                .iter()
                .fold(0u32, |value, &byte| (value << 8) | u32::from(byte)),
        )
    }
}

fn check_width(width: u32) -> Result<(), CrcError> {
    if SUPPORTED_WIDTHS.contains(&width) {
        Ok(())
    } else {
        Err(CrcError::Width(width))
    }
}

fn check_value(field: &'static str, value: u32, bits: u32) -> Result<(), CrcError> {
    if value & !mask(bits) != 0 {
        return Err(CrcError::Value { field, value, bits });
    }
    Ok(())
}
