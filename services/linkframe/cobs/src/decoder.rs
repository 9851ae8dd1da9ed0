//! Incremental COBS decoding.
//!
//! The decoder alternates between expecting a length code and copying the
//! data bytes of the run that code announced. Zeros elided by the encoder are
//! reinserted when the next code arrives, unless the previous run was a full
//! `0xFF` run. Any terminal status latches until the decoder is reset.

use crate::{DecodeStatus, Status, DELIMITER};
use bytes::Bytes;
use tracing::{debug, trace};

/// Code byte announcing a full run with no implied zero.
const FULL_RUN_CODE: u8 = 0xFF;

/// Largest payload an encoded frame of `encoded_len` bytes can decode to.
pub const fn max_decode_len(encoded_len: usize) -> usize {
    if encoded_len > 1 {
        encoded_len - 2
    } else {
        0
    }
}

/// Cursor bookkeeping for one frame being decoded into a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodeState {
    /// Next byte to write
    write_pos: usize,
    /// Output capacity, `write_pos` never passes it
    end: usize,
    /// Data bytes left before the next length code
    remaining: u8,
    /// No length code seen yet in this frame
    fresh: bool,
    /// The run that just ended implies a zero byte
    implied_zero: bool,
    /// Terminal status, once reached
    latched: Option<Status>,
}

impl DecodeState {
    pub(crate) const fn new(end: usize) -> Self {
        Self {
            write_pos: 0,
            end,
            remaining: 0,
            fresh: true,
            implied_zero: false,
            latched: None,
        }
    }

    /// Decoded bytes written so far
    pub(crate) fn len(&self) -> usize {
        self.write_pos
    }

    pub(crate) fn status(&self) -> Status {
        self.latched.unwrap_or(Status::Processing)
    }

    /// Feed one byte. `out` must be the same buffer, at least `end` long,
    /// for the whole frame.
    pub(crate) fn push(&mut self, out: &mut [u8], byte: u8) -> Status {
        if let Some(status) = self.latched {
            return status;
        }

        let status = self.advance(out, byte);
        if status.is_terminal() {
            match status {
                Status::FrameAvailable => trace!("COBS frame decoded: {} bytes", self.write_pos),
                _ => debug!("COBS decode stopped after {} bytes: {}", self.write_pos, status),
            }
            self.latched = Some(status);
        }
        status
    }

    fn advance(&mut self, out: &mut [u8], byte: u8) -> Status {
        if self.remaining == 0 {
            if byte == DELIMITER {
                // A frame always starts with a non-zero code.
                if self.fresh {
                    return Status::MalformedFrame;
                }
                return Status::FrameAvailable;
            }

            if self.implied_zero && !self.write(out, DELIMITER) {
                return Status::Overflow;
            }

            self.remaining = byte - 1;
            self.implied_zero = byte != FULL_RUN_CODE;
            self.fresh = false;
            return Status::Processing;
        }

        if byte == DELIMITER {
            return Status::MalformedFrame;
        }

        if !self.write(out, byte) {
            return Status::Overflow;
        }
        self.remaining -= 1;
        Status::Processing
    }

    fn write(&mut self, out: &mut [u8], byte: u8) -> bool {
        if self.write_pos >= self.end {
            return false;
        }
        out[self.write_pos] = byte;
        self.write_pos += 1;
        true
    }
}

/// Decode the first frame in `input` into `out`.
///
/// Reports [`DecodeStatus::IncompleteFrame`] if `input` ends before the frame
/// is terminated. Bytes after the first terminal status are not examined.
pub fn decode_into<'a>(out: &'a mut [u8], input: &[u8]) -> DecodeStatus<'a> {
    let mut state = DecodeState::new(out.len());

    for &byte in input {
        match state.push(out, byte) {
            Status::Processing => continue,
            Status::FrameAvailable => return DecodeStatus::FrameAvailable(&out[..state.len()]),
            Status::MalformedFrame => return DecodeStatus::MalformedFrame,
            Status::Overflow => return DecodeStatus::Overflow,
            Status::IncompleteFrame => return DecodeStatus::IncompleteFrame,
        }
    }

    DecodeStatus::IncompleteFrame
}

/// Decode the first frame in `input`.
///
/// The output buffer is sized to the input rather than to
/// `max_decode_len(input.len())`, so a truncated frame reports
/// [`Status::IncompleteFrame`] instead of [`Status::Overflow`].
pub fn decode(input: &[u8]) -> (Status, Option<Bytes>) {
    let mut out = vec![0u8; input.len()];
    let status = decode_into(&mut out, input);
    match status {
        DecodeStatus::FrameAvailable(frame) => {
            (Status::FrameAvailable, Some(Bytes::copy_from_slice(frame)))
        }
        other => (other.status(), None),
    }
}

/// Incremental COBS decoder over a fixed-capacity buffer.
#[derive(Debug)]
pub struct CobsDecoder {
    buf: Box<[u8]>,
    state: DecodeState,
}

impl CobsDecoder {
    /// Create a decoder for payloads of up to `max_decoded_len` bytes.
    pub fn new(max_decoded_len: usize) -> Self {
        Self {
            buf: vec![0u8; max_decoded_len].into_boxed_slice(),
            state: DecodeState::new(max_decoded_len),
        }
    }

    /// Output buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Start over on a new frame, discarding any decoded bytes.
    pub fn reset(&mut self) {
        self.state = DecodeState::new(self.buf.len());
    }

    /// Current status: [`Status::Processing`] or the latched terminal status.
    pub fn status(&self) -> Status {
        self.state.status()
    }

    /// The decoded frame, if one is available.
    pub fn frame(&self) -> Option<&[u8]> {
        match self.state.status() {
            Status::FrameAvailable => Some(&self.buf[..self.state.len()]),
            _ => None,
        }
    }

    /// Feed one byte.
    ///
    /// Once a terminal status is returned, further bytes are ignored and the
    /// same status is reported again until [`CobsDecoder::reset`].
    pub fn decode(&mut self, byte: u8) -> DecodeStatus<'_> {
        let status = self.state.push(&mut self.buf, byte);
        self.view(status)
    }

    /// Feed bytes until a terminal status is reached or `bytes` runs out.
    ///
    /// Returns the number of bytes consumed, including the byte that produced
    /// a terminal status. Zero bytes are consumed if a status was already
    /// latched.
    pub fn decode_chunk(&mut self, bytes: &[u8]) -> (usize, DecodeStatus<'_>) {
        let mut status = self.state.status();
        let mut consumed = 0;

        while !status.is_terminal() && consumed < bytes.len() {
            status = self.state.push(&mut self.buf, bytes[consumed]);
            consumed += 1;
        }

        (consumed, self.view(status))
    }

    fn view(&self, status: Status) -> DecodeStatus<'_> {
        match status {
            Status::Processing => DecodeStatus::Processing,
            Status::FrameAvailable => DecodeStatus::FrameAvailable(&self.buf[..self.state.len()]),
            Status::MalformedFrame => DecodeStatus::MalformedFrame,
            Status::Overflow => DecodeStatus::Overflow,
            Status::IncompleteFrame => DecodeStatus::IncompleteFrame,
        }
    }
}
