//! Running CRC computations over a shared profile.

use crate::table::mask;
use crate::{CrcError, CrcProfile};

/// A running CRC computation.
///
/// The engine carries the raw register between calls; every update returns
/// the checksum as it would be if the input ended there, so repeated updates
/// chain exactly.
#[derive(Debug, Clone, Copy)]
pub struct Crc<'p> {
    profile: &'p CrcProfile,
    register: u32,
}

impl<'p> Crc<'p> {
    /// Start a computation from the profile's initial value.
    pub fn new(profile: &'p CrcProfile) -> Self {
        Self {
            profile,
            register: profile.initial(),
        }
    }

    /// Start a computation, requiring the profile to be `bits` wide.
    pub fn with_width(bits: u32, profile: &'p CrcProfile) -> Result<Self, CrcError> {
        if !crate::SUPPORTED_WIDTHS.contains(&bits) {
            return Err(CrcError::Width(bits));
        }
        if profile.width() != bits {
            return Err(CrcError::WidthMismatch {
                requested: bits,
                actual: profile.width(),
            });
        }
        Ok(Self::new(profile))
    }

    /// Continue a computation from a raw (not final-XORed) register.
    ///
    /// Bits above the profile's width are discarded.
    pub fn resume(profile: &'p CrcProfile, register: u32) -> Self {
        Self {
            profile,
            register: register & mask(profile.width()),
        }
    }

    /// The profile this computation runs on
    pub fn profile(&self) -> &'p CrcProfile {
        self.profile
    }

    /// The raw register carried between updates
    pub fn register(&self) -> u32 {
        self.register
    }

    /// Checksum of everything fed since the last reset.
    pub fn value(&self) -> u32 {
        self.profile.finalize(self.register)
    }

    /// Restart from the profile's initial value.
    pub fn reset(&mut self) {
        self.register = self.profile.initial();
    }

    /// Feed one byte and return the checksum so far.
    pub fn update(&mut self, byte: u8) -> u32 {
        self.register = self.profile.step(self.register, byte);
        self.value()
    }

    /// Feed a sequence of bytes and return the checksum so far.
    pub fn update_seq(&mut self, bytes: &[u8]) -> u32 {
        self.register = self.profile.fold(self.register, bytes);
        self.value()
    }

    /// One-shot checksum of `bytes`; the running register is left untouched.
    pub fn block(&self, bytes: &[u8]) -> u32 {
        self.profile.checksum(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CrcStandard, CHECK_INPUT};
    use proptest::prelude::*;

    #[test]
    fn test_block() {
        for standard in CrcStandard::ALL {
            let crc = Crc::new(standard.profile());
            assert_eq!(crc.block(CHECK_INPUT), standard.check(), "{}", standard);
        }
    }

    #[test]
    fn test_byte() {
        for standard in CrcStandard::ALL {
            let mut crc = Crc::new(standard.profile());
            for i in 0..4 {
                crc.update(i);
            }
            crc.reset();

            let (last, head) = CHECK_INPUT.split_last().unwrap();
            for &b in head {
                assert_ne!(crc.update(b), standard.check(), "{}", standard);
            }
            assert_eq!(crc.update(*last), standard.check(), "{}", standard);
            assert_eq!(crc.value(), standard.check());
        }
    }

    #[test]
    fn test_seq() {
        for standard in CrcStandard::ALL {
            let mut crc = Crc::new(standard.profile());
            for i in 0..4 {
                crc.update(i);
            }
            crc.reset();

            assert_ne!(crc.update_seq(&CHECK_INPUT[..4]), standard.check());
            assert_eq!(crc.update_seq(&CHECK_INPUT[4..]), standard.check());
        }
    }

    #[test]
    fn test_resume() {
        let profile = CrcStandard::Crc32.profile();
        let mut first = Crc::new(profile);
        first.update_seq(&CHECK_INPUT[..5]);

        let mut second = Crc::resume(profile, first.register());
        assert_eq!(second.update_seq(&CHECK_INPUT[5..]), 0xCBF43926);
    }

    #[test]
    fn test_resume_masks_register() {
        let profile = CrcStandard::Crc8Darc.profile();
        let mut wide = Crc::resume(profile, 0x12345);
        let mut narrow = Crc::resume(profile, 0x45);
        assert_eq!(wide.register(), 0x45);
        assert_eq!(wide.update_seq(CHECK_INPUT), narrow.update_seq(CHECK_INPUT));
        assert!(wide.value() <= 0xFF);
    }

    #[test]
    fn test_with_width() {
        let profile = CrcStandard::Crc16Kermit.profile();
        assert!(Crc::with_width(16, profile).is_ok());
        assert_eq!(
            Crc::with_width(32, profile).unwrap_err(),
            CrcError::WidthMismatch {
                requested: 32,
                actual: 16
            }
        );
        assert_eq!(
            Crc::with_width(24, profile).unwrap_err(),
            CrcError::Width(24)
        );
    }

    #[test]
    fn test_empty_input() {
        let profile = CrcStandard::Crc16CcittFalse.profile();
        assert_eq!(Crc::new(profile).value(), 0xFFFF);
        assert_eq!(profile.checksum(&[]), 0xFFFF);
    }

    proptest! {
        #[test]
        fn prop_split_matches_block(
            data in proptest::collection::vec(any::<u8>(), 0..512),
            split in any::<proptest::sample::Index>(),
        ) {
            let at = split.index(data.len() + 1);
            for standard in CrcStandard::ALL {
                let mut crc = Crc::new(standard.profile());
                crc.update_seq(&data[..at]);
                let value = crc.update_seq(&data[at..]);
                prop_assert_eq!(value, crc.block(&data));
            }
        }
    }
}
