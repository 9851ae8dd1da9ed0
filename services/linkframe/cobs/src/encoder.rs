//! Incremental COBS encoding.
//!
//! The encoder reserves one byte for the length code of the current run,
//! copies non-zero input through, and backfills the reserved byte whenever a
//! run closes (on a zero, or when a 254-byte run is followed by more input).

use crate::{CobsError, DELIMITER, MAX_RUN};
use bytes::{Bytes, BytesMut};
use tracing::{trace, warn};

/// Worst-case encoded length (including the terminator) of a payload of
/// `decoded_len` bytes. Saturates at `usize::MAX`.
pub const fn max_encode_len(decoded_len: usize) -> usize {
    if decoded_len == 0 {
        return 2;
    }
    let codes = decoded_len / MAX_RUN + (decoded_len % MAX_RUN != 0) as usize;
    decoded_len.saturating_add(codes).saturating_add(1)
}

/// Cursor bookkeeping for one frame being encoded into a buffer.
///
/// Callers guarantee the buffer holds `max_encode_len` of everything pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EncodeState {
    /// Slot reserved for the current run's length code
    code_pos: usize,
    /// Next byte to write
    write_pos: usize,
    /// Non-zero bytes in the current run (0..=254)
    run: u8,
}

impl EncodeState {
    pub(crate) const fn new() -> Self {
        Self {
            code_pos: 0,
            write_pos: 1,
            run: 0,
        }
    }

    pub(crate) fn push(&mut self, out: &mut [u8], input: &[u8]) {
        for &byte in input {
            if self.run as usize == MAX_RUN {
                self.close_run(out);
            }

            if byte == DELIMITER {
                self.close_run(out);
            } else {
                out[self.write_pos] = byte;
                self.write_pos += 1;
                self.run += 1;
            }
        }
    }

    /// Backfill the last code, append the terminator and return the frame length.
    pub(crate) fn finish(&mut self, out: &mut [u8]) -> usize {
        out[self.code_pos] = self.run + 1;
        out[self.write_pos] = DELIMITER;
        self.write_pos += 1;
        self.write_pos
    }

    fn close_run(&mut self, out: &mut [u8]) {
        out[self.code_pos] = self.run + 1;
        self.code_pos = self.write_pos;
        self.write_pos += 1;
        self.run = 0;
    }
}

/// Encode `input` as one complete frame into `out`.
///
/// Returns the frame length, terminator included. Fails without touching
/// `out` if it is shorter than `max_encode_len(input.len())`.
pub fn encode_into(out: &mut [u8], input: &[u8]) -> Result<usize, CobsError> {
    let required = max_encode_len(input.len());
    if required > out.len() {
        return Err(CobsError::Capacity {
            required,
            capacity: out.len(),
        });
    }

    let mut state = EncodeState::new();
    state.push(out, input);
    Ok(state.finish(out))
}

/// Encode `input` as one complete frame.
pub fn encode(input: &[u8]) -> Bytes {
    let mut buf = BytesMut::zeroed(max_encode_len(input.len()));
    let mut state = EncodeState::new();
    state.push(&mut buf, input);
    let len = state.finish(&mut buf);
    buf.truncate(len);
    buf.freeze()
}

/// Incremental COBS encoder over a fixed-capacity buffer.
///
/// Payload bytes may be supplied in any number of chunks; the finished frame
/// is identical to encoding their concatenation at once.
#[derive(Debug)]
pub struct CobsEncoder {
    buf: Box<[u8]>,
    state: EncodeState,
    accepted: usize,
}

impl CobsEncoder {
    /// Create an encoder whose output buffer holds `max_encoded_len` bytes.
    ///
    /// The buffer never shrinks below the two bytes of an empty frame.
    pub fn new(max_encoded_len: usize) -> Self {
        let capacity = max_encoded_len.max(max_encode_len(0));
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            state: EncodeState::new(),
            accepted: 0,
        }
    }

    /// Create an encoder able to frame payloads of up to `max_payload_len` bytes.
    pub fn for_payload(max_payload_len: usize) -> Self {
        Self::new(max_encode_len(max_payload_len))
    }

    /// Output buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Payload bytes accepted since the last reset
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Discard the frame in progress.
    pub fn reset(&mut self) {
        self.state = EncodeState::new();
        self.accepted = 0;
    }

    /// Append payload bytes to the frame in progress.
    ///
    /// The whole chunk is rejected, and the frame left as it was, if the
    /// worst-case encoding of the payload would no longer fit the buffer.
    pub fn encode(&mut self, chunk: &[u8]) -> Result<(), CobsError> {
        let total = self.accepted.saturating_add(chunk.len());
        let required = max_encode_len(total);
        if required > self.buf.len() {
            warn!(
                "COBS encoder capacity exceeded: {} payload bytes need {} of {}",
                total,
                required,
                self.buf.len()
            );
            return Err(CobsError::Capacity {
                required,
                capacity: self.buf.len(),
            });
        }

        self.state.push(&mut self.buf, chunk);
        self.accepted = total;
        Ok(())
    }

    /// Finalize the frame, reset the encoder and return the encoded bytes.
    ///
    /// The slice stays valid until the encoder is used again.
    pub fn get(&mut self) -> &[u8] {
        let len = self.state.finish(&mut self.buf);
        trace!("COBS frame finalized: {} payload bytes, {} encoded", self.accepted, len);
        self.reset();
        &self.buf[..len]
    }

    /// Finalize the frame, reset the encoder and return an owned copy.
    pub fn finish(&mut self) -> Bytes {
        Bytes::copy_from_slice(self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_vectors::vectors;
    use proptest::prelude::*;

    #[test]
    fn test_max_encode_len() {
        assert_eq!(max_encode_len(0), 2);
        assert_eq!(max_encode_len(1), 3);
        assert_eq!(max_encode_len(254), 256);
        assert_eq!(max_encode_len(255), 258);
        assert_eq!(max_encode_len(508), 511);
        assert_eq!(max_encode_len(509), 513);
        assert_eq!(max_encode_len(usize::MAX), usize::MAX);
        assert_eq!(max_encode_len(usize::MAX - 1000), usize::MAX);
    }

    #[test]
    fn test_encode_vectors() {
        for (i, (decoded, encoded)) in vectors().iter().enumerate() {
            assert_eq!(&encode(decoded)[..], &encoded[..], "vector {}", i);
        }
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(&encode(&[])[..], &[0x01, 0x00]);
    }

    #[test]
    fn test_full_run_has_no_trailing_code() {
        let payload: Vec<u8> = (0..254).map(|i| ((i + 1) % 256) as u8).collect();
        let frame = encode(&payload);

        assert_eq!(frame.len(), 256);
        assert_eq!(frame[0], 0xFF);
        assert_eq!(&frame[1..255], &payload[..]);
        assert_eq!(frame[255], 0x00);
    }

    #[test]
    fn test_encode_into() {
        let mut out = [0xAAu8; 8];
        let len = encode_into(&mut out, &[0x11, 0x22, 0x00, 0x33]).unwrap();
        assert_eq!(&out[..len], &[0x03, 0x11, 0x22, 0x02, 0x33, 0x00]);
    }

    #[test]
    fn test_encode_into_too_small() {
        let mut out = [0u8; 4];
        let err = encode_into(&mut out, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            CobsError::Capacity {
                required: 5,
                capacity: 4
            }
        );
        assert_eq!(out, [0u8; 4]);
    }

    #[test]
    fn test_encoder_capacity() {
        let mut encoder = CobsEncoder::for_payload(1000);
        assert!(matches!(
            encoder.encode(&[0u8; 1001]),
            Err(CobsError::Capacity { .. })
        ));
        assert_eq!(encoder.accepted(), 0);

        encoder.encode(&[0u8; 1000]).unwrap();
        assert!(encoder.encode(&[0u8; 1]).is_err());
        assert_eq!(encoder.accepted(), 1000);
    }

    #[test]
    fn test_encoder_rejected_chunk_leaves_frame_intact() {
        let mut encoder = CobsEncoder::for_payload(4);
        encoder.encode(&[0x11, 0x22]).unwrap();
        assert!(encoder.encode(&[0x33, 0x44, 0x55]).is_err());
        encoder.encode(&[0x00, 0x33]).unwrap();
        assert_eq!(encoder.get(), &[0x03, 0x11, 0x22, 0x02, 0x33, 0x00]);
    }

    #[test]
    fn test_encoder_blocks() {
        let mut encoder = CobsEncoder::for_payload(1000);
        encoder.encode(&[0u8; 1000]).unwrap();
        encoder.reset();

        for (i, (decoded, encoded)) in vectors().iter().enumerate() {
            for block in decoded.chunks(25) {
                encoder.encode(block).unwrap();
            }
            assert_eq!(encoder.get(), &encoded[..], "vector {}", i);
        }
    }

    #[test]
    fn test_encoder_get_resets() {
        let mut encoder = CobsEncoder::new(16);
        encoder.encode(&[0x42]).unwrap();
        assert_eq!(encoder.finish(), Bytes::from_static(&[0x02, 0x42, 0x00]));
        assert_eq!(encoder.accepted(), 0);
        assert_eq!(encoder.get(), &[0x01, 0x00]);
    }

    #[test]
    fn test_encoder_minimum_capacity() {
        let mut encoder = CobsEncoder::new(0);
        assert_eq!(encoder.capacity(), 2);
        assert!(encoder.encode(&[1]).is_err());
        assert_eq!(encoder.get(), &[0x01, 0x00]);
    }

    proptest! {
        #[test]
        fn prop_chunking_does_not_change_output(
            payload in proptest::collection::vec(any::<u8>(), 0..1200),
            split in 1usize..300,
        ) {
            let mut encoder = CobsEncoder::for_payload(payload.len());
            for chunk in payload.chunks(split) {
                encoder.encode(chunk).unwrap();
            }
            let incremental = encoder.finish();
            prop_assert_eq!(incremental, encode(&payload));
        }

        #[test]
        fn prop_single_delimiter(payload in proptest::collection::vec(any::<u8>(), 0..1200)) {
            let frame = encode(&payload);
            prop_assert!(frame.len() <= max_encode_len(payload.len()));
            prop_assert_eq!(frame.iter().filter(|&&b| b == DELIMITER).count(), 1);
            prop_assert_eq!(frame[frame.len() - 1], DELIMITER);
        }
    }
}
