//! Basic usage example for linkframe COBS framing.

use link_cobs::{max_encode_len, CobsDecoder, CobsEncoder, DecodeStatus};
use link_crc::{Crc, CrcStandard};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== linkframe COBS Example ===\n");

    let payload = b"Hello\0serial\0link!";
    let profile = CrcStandard::Crc16Kermit.profile();

    // 1. Frame a payload in chunks, with a trailing checksum
    println!("1. Encoding a {} byte payload...", payload.len());
    let mut crc = Crc::new(profile);
    let mut encoder = CobsEncoder::for_payload(64);

    for chunk in payload.chunks(5) {
        encoder.encode(chunk)?;
        crc.update_seq(chunk);
    }
    println!("   Checksum: {:#06x}", crc.value());
    encoder.encode(&profile.to_be_bytes(crc.value()))?;

    let frame = encoder.finish();
    println!(
        "   Encoded frame size: {} bytes (worst case {})",
        frame.len(),
        max_encode_len(payload.len() + profile.byte_len())
    );
    println!("   Zero bytes inside the frame: {}", frame[..frame.len() - 1].contains(&0));

    // 2. Decode it byte by byte, as it would arrive on a link
    println!("\n2. Decoding byte by byte...");
    let mut decoder = CobsDecoder::new(64);
    for &byte in frame.iter() {
        match decoder.decode(byte) {
            DecodeStatus::Processing => continue,
            DecodeStatus::FrameAvailable(decoded) => {
                let (body, trailer) = decoded.split_at(decoded.len() - profile.byte_len());
                let expected = profile.from_be_bytes(trailer).unwrap_or_default();
                println!("   Payload: {:?}", String::from_utf8_lossy(body));
                println!("   Checksum valid: {}", profile.checksum(body) == expected);
                break;
            }
            other => {
                println!("   Frame rejected: {}", other.status());
                break;
            }
        }
    }

    // 3. A frame that does not fit is reported, not written past the buffer
    println!("\n3. Feeding a frame into a small decoder...");
    let mut small = CobsDecoder::new(4);
    let (consumed, status) = small.decode_chunk(&frame);
    println!("   Stopped after {} bytes with status {}", consumed, status.status());

    Ok(())
}
