//! Decode status reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoder status codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// More bytes are needed
    Processing = 0,
    /// A complete frame was decoded
    FrameAvailable = 1,
    /// The frame violates the length encoding
    MalformedFrame = 2,
    /// The decoded payload does not fit the output buffer
    Overflow = 3,
    /// Input ended before the frame was terminated (whole-buffer decode only)
    IncompleteFrame = 4,
}

impl Status {
    /// Whether the decoder must be reset before it can make progress again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Processing)
    }

    /// Whether the status reports a corrupt or unusable frame.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Status::MalformedFrame | Status::Overflow | Status::IncompleteFrame
        )
    }
}

impl TryFrom<u8> for Status {
    type Error = crate::CobsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Status::Processing),
            1 => Ok(Status::FrameAvailable),
            2 => Ok(Status::MalformedFrame),
            3 => Ok(Status::Overflow),
            4 => Ok(Status::IncompleteFrame),
            _ => Err(crate::CobsError::Status(value)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Processing => "processing",
            Status::FrameAvailable => "frame available",
            Status::MalformedFrame => "malformed frame",
            Status::Overflow => "overflow",
            Status::IncompleteFrame => "incomplete frame",
        };
        f.write_str(name)
    }
}

/// Result of feeding input to a decoder.
///
/// Only [`DecodeStatus::FrameAvailable`] carries data: a view of the decoded
/// payload borrowed from the decoder's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus<'a> {
    /// More bytes are needed
    Processing,
    /// A complete frame was decoded
    FrameAvailable(&'a [u8]),
    /// The frame violates the length encoding
    MalformedFrame,
    /// The decoded payload does not fit the output buffer
    Overflow,
    /// Input ended before the frame was terminated
    IncompleteFrame,
}

impl<'a> DecodeStatus<'a> {
    /// The plain status code.
    pub fn status(&self) -> Status {
        match self {
            DecodeStatus::Processing => Status::Processing,
            DecodeStatus::FrameAvailable(_) => Status::FrameAvailable,
            DecodeStatus::MalformedFrame => Status::MalformedFrame,
            DecodeStatus::Overflow => Status::Overflow,
            DecodeStatus::IncompleteFrame => Status::IncompleteFrame,
        }
    }

    /// The decoded payload, if a frame is available.
    pub fn frame(&self) -> Option<&'a [u8]> {
        match *self {
            DecodeStatus::FrameAvailable(frame) => Some(frame),
            _ => None,
        }
    }

    /// Whether the decoder must be reset before it can make progress again.
    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        for code in 0..=4u8 {
            let status = Status::try_from(code).unwrap();
            assert_eq!(status as u8, code);
        }
        assert!(Status::try_from(5).is_err());
    }

    #[test]
    fn test_status_classification() {
        assert!(!Status::Processing.is_terminal());
        assert!(Status::FrameAvailable.is_terminal());
        assert!(!Status::FrameAvailable.is_error());
        assert!(Status::MalformedFrame.is_error());
        assert!(Status::Overflow.is_error());
        assert!(Status::IncompleteFrame.is_error());
    }

    #[test]
    fn test_decode_status_frame() {
        let data = [1u8, 2, 3];
        let status = DecodeStatus::FrameAvailable(&data);
        assert_eq!(status.status(), Status::FrameAvailable);
        assert_eq!(status.frame(), Some(&data[..]));
        assert_eq!(DecodeStatus::Overflow.frame(), None);
    }
}
