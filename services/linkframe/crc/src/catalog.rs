//! Registry of standard CRC algorithms.
//!
//! Profiles for the catalogue algorithms are generated at compile time and
//! live for the whole process; lookups hand out shared references.

use crate::{CrcError, CrcParams, CrcProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference input for catalogue check values
pub const CHECK_INPUT: &[u8] = b"123456789";

/// Standard CRC algorithms known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrcStandard {
    /// CRC-8/DARC
    #[serde(rename = "CRC-8/DARC")]
    Crc8Darc,
    /// CRC-8/I-CODE
    #[serde(rename = "CRC-8/I-CODE")]
    Crc8ICode,
    /// CRC-16/KERMIT
    #[serde(rename = "CRC-16/KERMIT")]
    Crc16Kermit,
    /// CRC-16/CCITT-FALSE
    #[serde(rename = "CRC-16/CCITT-FALSE", alias = "CRC-16/IBM-3740")]
    Crc16CcittFalse,
    /// CRC-32
    #[serde(rename = "CRC-32", alias = "CRC-32/ISO-HDLC")]
    Crc32,
    /// CRC-32/MPEG-2
    #[serde(rename = "CRC-32/MPEG-2")]
    Crc32Mpeg2,
}

static PROFILES: [CrcProfile; 6] = [
    CrcProfile::from_params(CrcStandard::Crc8Darc.params()),
    CrcProfile::from_params(CrcStandard::Crc8ICode.params()),
    CrcProfile::from_params(CrcStandard::Crc16Kermit.params()),
    CrcProfile::from_params(CrcStandard::Crc16CcittFalse.params()),
    CrcProfile::from_params(CrcStandard::Crc32.params()),
    CrcProfile::from_params(CrcStandard::Crc32Mpeg2.params()),
];

impl CrcStandard {
    /// Every registered algorithm, in registry order
    pub const ALL: [CrcStandard; 6] = [
        CrcStandard::Crc8Darc,
        CrcStandard::Crc8ICode,
        CrcStandard::Crc16Kermit,
        CrcStandard::Crc16CcittFalse,
        CrcStandard::Crc32,
        CrcStandard::Crc32Mpeg2,
    ];

    /// Catalogue name
    pub const fn name(self) -> &'static str {
        match self {
            CrcStandard::Crc8Darc => "CRC-8/DARC",
            CrcStandard::Crc8ICode => "CRC-8/I-CODE",
            CrcStandard::Crc16Kermit => "CRC-16/KERMIT",
            CrcStandard::Crc16CcittFalse => "CRC-16/CCITT-FALSE",
            CrcStandard::Crc32 => "CRC-32",
            CrcStandard::Crc32Mpeg2 => "CRC-32/MPEG-2",
        }
    }

    /// Other catalogue names for the same algorithm
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            CrcStandard::Crc16CcittFalse => &["CRC-16/IBM-3740"],
            CrcStandard::Crc32 => &["CRC-32/ISO-HDLC"],
            _ => &[],
        }
    }

    /// Algorithm parameters
    pub const fn params(self) -> CrcParams {
        match self {
            CrcStandard::Crc8Darc => CrcParams::new(8, 0x39, 0x00, 0x00, true),
            CrcStandard::Crc8ICode => CrcParams::new(8, 0x1D, 0xFD, 0x00, false),
            CrcStandard::Crc16Kermit => CrcParams::new(16, 0x1021, 0x0000, 0x0000, true),
            CrcStandard::Crc16CcittFalse => CrcParams::new(16, 0x1021, 0xFFFF, 0x0000, false),
            CrcStandard::Crc32 => CrcParams::new(32, 0x04C11DB7, 0xFFFFFFFF, 0xFFFFFFFF, true),
            CrcStandard::Crc32Mpeg2 => {
                CrcParams::new(32, 0x04C11DB7, 0xFFFFFFFF, 0x00000000, false)
            }
        }
    }

    /// Checksum of [`CHECK_INPUT`]
    pub const fn check(self) -> u32 {
        match self {
            CrcStandard::Crc8Darc => 0x15,
            CrcStandard::Crc8ICode => 0x7E,
            CrcStandard::Crc16Kermit => 0x2189,
            CrcStandard::Crc16CcittFalse => 0x29B1,
            CrcStandard::Crc32 => 0xCBF43926,
            CrcStandard::Crc32Mpeg2 => 0x0376E6E7,
        }
    }

    /// Register width in bits
    pub const fn width(self) -> u32 {
        self.params().bits
    }

    /// The shared profile for this algorithm
    pub fn profile(self) -> &'static CrcProfile {
        &PROFILES[self as usize]
    }

    /// Look up a profile by name, requiring it to be `bits` wide.
    pub fn profile_with_width(name: &str, bits: u32) -> Result<&'static CrcProfile, CrcError> {
        if !crate::SUPPORTED_WIDTHS.contains(&bits) {
            return Err(CrcError::Width(bits));
        }

        let standard: CrcStandard = name.parse()?;
        if standard.width() != bits {
            return Err(CrcError::WidthMismatch {
                requested: bits,
                actual: standard.width(),
            });
        }
        Ok(standard.profile())
    }
}

impl FromStr for CrcStandard {
    type Err = CrcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        CrcStandard::ALL
            .into_iter()
            .find(|standard| {
                standard.name().eq_ignore_ascii_case(name)
                    || standard
                        .aliases()
                        .iter()
                        .any(|alias| alias.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| CrcError::Unknown(name.to_string()))
    }
}

impl fmt::Display for CrcStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
