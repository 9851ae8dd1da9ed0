//! CRC lookup table generation.
//!
//! Each table entry is the remainder of one byte value after eight steps of
//! serial polynomial division, so the engine can advance a whole byte with a
//! single lookup. Generation is a `const fn`, which lets the standard profiles
//! be built at compile time.

use crate::CrcError;

/// Number of entries in a CRC lookup table
pub const TABLE_LEN: usize = 256;

/// Narrowest register a table can be built for
pub const MIN_TABLE_BITS: u32 = 8;

/// Widest register a table can be built for
pub const MAX_TABLE_BITS: u32 = 32;

/// A 256-entry lookup table. Entries hold register-width values in the low bits.
pub type CrcTable = [u32; TABLE_LEN];

/// Mask selecting the low `bits` bits.
pub(crate) const fn mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Reverse the low `bits` bits of `value`; higher bits are dropped.
pub const fn reflect(value: u32, bits: u32) -> u32 {
    let mut output = 0u32;
    let mut i = 0;
    while i < bits {
        output |= ((value >> i) & 0x01) << (bits - 1 - i);
        i += 1;
    }
    output
}

/// Build the lookup table for a `bits`-wide generator polynomial.
///
/// `poly` is given in normal (MSB-first) notation without the implicit top
/// bit. With `lsb_first` the table is built for reflected input and output.
pub fn crc_table(bits: u32, poly: u32, lsb_first: bool) -> Result<CrcTable, CrcError> {
    if !(MIN_TABLE_BITS..=MAX_TABLE_BITS).contains(&bits) {
        return Err(CrcError::Width(bits));
    }

    if poly & !mask(bits) != 0 {
        return Err(CrcError::Polynomial { poly, bits });
    }

    Ok(generate(bits, poly, lsb_first))
}

/// Table generation without parameter checks; `bits` must lie in 8..=32.
pub(crate) const fn generate(bits: u32, poly: u32, lsb_first: bool) -> CrcTable {
    let mask = mask(bits) as u64;
    let top = 1u64 << (bits - 1);
    let reflected = reflect(poly, bits) as u64;
    let poly = poly as u64;

    let mut table = [0u32; TABLE_LEN];
    let mut byte = 0;
    while byte < TABLE_LEN {
        let mut crc = if lsb_first {
            byte as u64
        } else {
            (byte as u64) << (bits - 8)
        };

        let mut step = 0;
        while step < 8 {
            crc = if lsb_first {
                if crc & 0x01 != 0 {
                    (crc >> 1) ^ reflected
                } else {
                    crc >> 1
                }
            } else if crc & top != 0 {
                (crc << 1) ^ poly
            } else {
                crc << 1
            };
            step += 1;
        }

        table[byte] = (crc & mask) as u32;
        byte += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(0x01, 8), 0x80);
        assert_eq!(reflect(0x1021, 16), 0x8408);
        assert_eq!(reflect(0x04C11DB7, 32), 0xEDB88320);
        assert_eq!(reflect(0x39, 8), 0x9C);
    }

    #[test]
    fn test_known_entries() {
        // CRC-32 (reflected 0x04C11DB7)
        let table = crc_table(32, 0x04C11DB7, true).unwrap();
        assert_eq!(table[0], 0x00000000);
        assert_eq!(table[1], 0x77073096);
        assert_eq!(table[255], 0x2D02EF8D);

        // CRC-32/MPEG-2 (MSB-first 0x04C11DB7)
        let table = crc_table(32, 0x04C11DB7, false).unwrap();
        assert_eq!(table[1], 0x04C11DB7);
        assert_eq!(table[255], 0xB1F740B4);

        // CRC-16/CCITT (MSB-first 0x1021)
        let table = crc_table(16, 0x1021, false).unwrap();
        assert_eq!(table[1], 0x1021);
        assert_eq!(table[255], 0x1EF0);

        // CRC-16/KERMIT (reflected 0x1021)
        let table = crc_table(16, 0x1021, true).unwrap();
        assert_eq!(table[1], 0x1189);
        assert_eq!(table[128], 0x8408);
    }

    #[test]
    fn test_entries_fit_width() {
        for bits in [8u32, 12, 16, 24, 31, 32] {
            let table = crc_table(bits, 0x07, false).unwrap();
            assert!(table.iter().all(|&v| v & !mask(bits) == 0), "bits {}", bits);
        }
    }

    #[test]
    fn test_eight_bit_orders() {
        // For 8-bit registers the MSB-first entry of b is the remainder of b.
        let table = crc_table(8, 0x07, false).unwrap();
        assert_eq!(table[1], 0x07);
        assert_eq!(table[0x80], 0x89);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(crc_table(7, 0x07, false), Err(CrcError::Width(7)));
        assert_eq!(crc_table(33, 0x07, false), Err(CrcError::Width(33)));
        assert_eq!(
            crc_table(8, 0x107, false),
            Err(CrcError::Polynomial {
                poly: 0x107,
                bits: 8
            })
        );
    }
}
