//! Framing of payloads on a byte stream, with an optional trailing checksum.

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use link_cobs::{CobsDecoder, CobsEncoder, DecodeStatus, DELIMITER};
use link_crc::CrcProfile;

const COMPONENT: &str = "frames";

/// Frame one payload, appending its big-endian checksum when a profile is given.
pub fn encode_payload(
    payload: &[u8],
    profile: Option<&CrcProfile>,
    max_frame_len: usize,
) -> Result<Bytes> {
    if payload.len() > max_frame_len {
        bail!(
            "payload of {} bytes exceeds the {} byte frame limit",
            payload.len(),
            max_frame_len
        );
    }

    let mut encoder = CobsEncoder::for_payload(frame_capacity(profile, max_frame_len)?);
    encoder.encode(payload)?;

    if let Some(profile) = profile {
        let checksum = profile.checksum(payload);
        encoder.encode(&profile.to_be_bytes(checksum))?;
        component_debug!(COMPONENT, "Appended checksum {:#x} to {} byte payload", checksum, payload.len());
    }

    Ok(encoder.finish())
}

/// Outcome of decoding a byte stream
#[derive(Debug, Default, PartialEq)]
pub struct DecodeReport {
    /// Payloads that decoded and, when checked, carried a matching checksum
    pub frames: Vec<Bytes>,
    /// Frames dropped as malformed
    pub malformed: usize,
    /// Frames dropped for exceeding the frame limit
    pub overflowed: usize,
    /// Frames dropped for a missing or mismatched checksum
    pub bad_checksum: usize,
    /// Whether the stream ended inside a frame
    pub truncated: bool,
}

impl DecodeReport {
    /// Number of frames dropped for any reason
    pub fn dropped(&self) -> usize {
        self.malformed + self.overflowed + self.bad_checksum + usize::from(self.truncated)
    }
}

/// Decode every frame in `stream`.
///
/// Bad frames are logged and skipped; decoding resumes after the next
/// delimiter.
pub fn decode_stream(
    stream: &[u8],
    profile: Option<&CrcProfile>,
    max_frame_len: usize,
) -> Result<DecodeReport> {
    let mut decoder = CobsDecoder::new(frame_capacity(profile, max_frame_len)?);
    let capacity = decoder.capacity();
    let mut report = DecodeReport::default();
    let mut pos = 0;

    while pos < stream.len() {
        let start = pos;
        let (consumed, status) = decoder.decode_chunk(&stream[pos..]);
        pos += consumed;

        match status {
            DecodeStatus::FrameAvailable(frame) => match verify(frame, profile) {
                Some(payload) => report.frames.push(Bytes::copy_from_slice(payload)),
                None => {
                    component_warn!(COMPONENT, "Dropping frame at offset {}: checksum mismatch", start);
                    report.bad_checksum += 1;
                }
            },
            DecodeStatus::MalformedFrame => {
                component_warn!(COMPONENT, "Dropping malformed frame at offset {}", start);
                report.malformed += 1;
                pos = resync(stream, pos);
            }
            DecodeStatus::Overflow => {
                component_warn!(
                    COMPONENT,
                    "Dropping frame at offset {}: longer than {} bytes",
                    start,
                    capacity
                );
                report.overflowed += 1;
                pos = resync(stream, pos);
            }
            DecodeStatus::Processing | DecodeStatus::IncompleteFrame => {
                component_warn!(COMPONENT, "Stream ended inside a frame starting at offset {}", start);
                report.truncated = true;
            }
        }

        decoder.reset();
    }

    component_debug!(
        COMPONENT,
        "Decoded {} frames from {} bytes, dropped {}",
        report.frames.len(),
        stream.len(),
        report.dropped()
    );
    Ok(report)
}

/// Decoded frame size: the payload limit plus room for the checksum.
fn frame_capacity(profile: Option<&CrcProfile>, max_frame_len: usize) -> Result<usize> {
    let trailer = profile.map_or(0, CrcProfile::byte_len);
    max_frame_len
        .checked_add(trailer)
        .filter(|&len| len < usize::MAX / 2)
        .with_context(|| format!("frame limit of {} bytes is too large", max_frame_len))
}

/// Position just past the delimiter ending the frame that stopped at `pos`.
fn resync(stream: &[u8], pos: usize) -> usize {
    if pos > 0 && stream[pos - 1] == DELIMITER {
        return pos;
    }
    match stream[pos..].iter().position(|&b| b == DELIMITER) {
        Some(offset) => pos + offset + 1,
        None => stream.len(),
    }
}

/// Split off and check the trailing checksum, returning the payload.
fn verify<'a>(frame: &'a [u8], profile: Option<&CrcProfile>) -> Option<&'a [u8]> {
    let Some(profile) = profile else {
        return Some(frame);
    };

    let split = frame.len().checked_sub(profile.byte_len())?;
    let (payload, trailer) = frame.split_at(split);
    let expected = profile.from_be_bytes(trailer)?;
    (profile.checksum(payload) == expected).then_some(payload)
}

/// Parse an unsigned integer given in decimal or with a `0x` prefix.
pub fn parse_int(text: &str) -> Result<u32, String> {
    let text = text.trim().replace('_', "");
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid number {:?}: {}", text, e))
}

/// Parse hex text, ignoring whitespace.
pub fn parse_hex(text: &[u8]) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    hex::decode(digits).context("input is not valid hex")
}

#[cfg(test)]
mod tests {
    use super::*;
    use link_crc::CrcStandard;

    fn stream_of(frames: &[Bytes]) -> Vec<u8> {
        frames.iter().flat_map(|f| f.iter().copied()).collect()
    }

    #[test]
    fn test_encode_without_crc() {
        let frame = encode_payload(&[0x11, 0x00, 0x22], None, 16).unwrap();
        assert_eq!(&frame[..], &[0x02, 0x11, 0x02, 0x22, 0x00]);
    }

    #[test]
    fn test_encode_with_crc() {
        let profile = CrcStandard::Crc16Kermit.profile();
        let frame = encode_payload(b"123456789", Some(profile), 16).unwrap();

        // 0x2189 follows the payload big-endian
        let (status, decoded) = link_cobs::decode(&frame);
        assert!(status == link_cobs::Status::FrameAvailable);
        assert_eq!(&decoded.unwrap()[..], b"123456789\x21\x89");
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        assert!(encode_payload(&[1u8; 17], None, 16).is_err());
    }

    #[test]
    fn test_decode_stream_round_trip() {
        let profile = CrcStandard::Crc32.profile();
        let payloads: [&[u8]; 4] = [b"", b"\x00", b"hello", &[0xAB; 300]];
        let frames: Vec<Bytes> = payloads
            .iter()
            .map(|p| encode_payload(p, Some(profile), 512).unwrap())
            .collect();

        let report = decode_stream(&stream_of(&frames), Some(profile), 512).unwrap();
        assert_eq!(report.frames.len(), payloads.len());
        for (decoded, payload) in report.frames.iter().zip(&payloads) {
            assert_eq!(&decoded[..], *payload);
        }
        assert_eq!(report.dropped(), 0);
    }

    #[test]
    fn test_decode_stream_drops_corrupted_frame() {
        let profile = CrcStandard::Crc16CcittFalse.profile();
        let first = encode_payload(b"first", Some(profile), 64).unwrap();
        let mut second = encode_payload(b"second", Some(profile), 64).unwrap().to_vec();
        second[3] ^= 0x40;
        let third = encode_payload(b"third", Some(profile), 64).unwrap();

        let mut stream = first.to_vec();
        stream.extend_from_slice(&second);
        stream.extend_from_slice(&third);

        let report = decode_stream(&stream, Some(profile), 64).unwrap();
        assert_eq!(report.frames, vec![Bytes::from_static(b"first"), Bytes::from_static(b"third")]);
        assert_eq!(report.bad_checksum, 1);
    }

    #[test]
    fn test_decode_stream_short_frame_fails_checksum() {
        let profile = CrcStandard::Crc32.profile();
        let report = decode_stream(&[0x02, 0x01, 0x00], Some(profile), 64).unwrap();
        assert!(report.frames.is_empty());
        assert_eq!(report.bad_checksum, 1);
    }

    #[test]
    fn test_decode_stream_resyncs_after_overflow() {
        let long = encode_payload(&[7u8; 40], None, 64).unwrap();
        let short = encode_payload(b"ok", None, 64).unwrap();
        let stream = stream_of(&[long, short]);

        let report = decode_stream(&stream, None, 16).unwrap();
        assert_eq!(report.frames, vec![Bytes::from_static(b"ok")]);
        assert_eq!(report.overflowed, 1);
    }

    #[test]
    fn test_decode_stream_resyncs_after_malformed() {
        // a zero inside a run ends the bad frame
        let mut stream = vec![0x05, 0x01, 0x00];
        stream.extend_from_slice(&encode_payload(b"ok", None, 16).unwrap());
        // a leading delimiter is its own malformed frame
        stream.push(0x00);
        stream.extend_from_slice(&encode_payload(b"again", None, 16).unwrap());

        let report = decode_stream(&stream, None, 16).unwrap();
        assert_eq!(
            report.frames,
            vec![Bytes::from_static(b"ok"), Bytes::from_static(b"again")]
        );
        assert_eq!(report.malformed, 2);
    }

    #[test]
    fn test_decode_stream_truncated_tail() {
        let mut stream = encode_payload(b"whole", None, 16).unwrap().to_vec();
        stream.extend_from_slice(&[0x04, b'p', b'a']);

        let report = decode_stream(&stream, None, 16).unwrap();
        assert_eq!(report.frames, vec![Bytes::from_static(b"whole")]);
        assert!(report.truncated);
    }

    #[test]
    fn test_huge_frame_limit_is_an_error() {
        let profile = CrcStandard::Crc32.profile();
        assert!(encode_payload(b"hi", Some(profile), usize::MAX).is_err());
        assert!(encode_payload(b"hi", None, usize::MAX).is_err());
        assert!(decode_stream(&[0x01, 0x00], Some(profile), usize::MAX - 2).is_err());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("4129"), Ok(4129));
        assert_eq!(parse_int("0x1021"), Ok(0x1021));
        assert_eq!(parse_int("0X04C1_1DB7"), Ok(0x04C11DB7));
        assert_eq!(parse_int(" 255 "), Ok(255));
        assert!(parse_int("0xZZ").is_err());
        assert!(parse_int("-1").is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex(b"01 02\nff\n").unwrap(), vec![0x01, 0x02, 0xFF]);
        assert!(parse_hex(b"abc").is_err());
    }
}
