//! Reference payload/frame pairs shared by the encoder and decoder tests.

/// Decoded payloads and their encoded frames.
pub(crate) fn vectors() -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut vectors = vec![
        (vec![], vec![0x01, 0x00]),
        (vec![0x00], vec![0x01, 0x01, 0x00]),
        (vec![0x00, 0x00], vec![0x01, 0x01, 0x01, 0x00]),
        (
            vec![0x11, 0x22, 0x00, 0x33],
            vec![0x03, 0x11, 0x22, 0x02, 0x33, 0x00],
        ),
        (
            vec![0x11, 0x22, 0x33, 0x44],
            vec![0x05, 0x11, 0x22, 0x33, 0x44, 0x00],
        ),
    ];

    // 254 non-zero bytes: one full run, no trailing code.
    let input: Vec<u8> = (0..254).map(|i| ((i + 1) % 256) as u8).collect();
    let mut output: Vec<u8> = (0..256).map(|i| (i % 256) as u8).collect();
    output[0] = 0xFF;
    output[255] = 0x00;
    vectors.push((input, output));

    // Leading zero followed by a full run.
    let input: Vec<u8> = (0..255).map(|i| (i % 256) as u8).collect();
    let mut output: Vec<u8> = (0..257).map(|i| ((i + 255) % 256) as u8).collect();
    output[0] = 0x01;
    output[1] = 0xFF;
    output[256] = 0x00;
    vectors.push((input, output));

    // Full run continued by one more non-zero byte.
    let input: Vec<u8> = (0..255).map(|i| ((i + 1) % 256) as u8).collect();
    let mut output: Vec<u8> = (0..258).map(|i| (i % 256) as u8).collect();
    output[0] = 0xFF;
    output[255] = 0x02;
    output[256] = 0xFF;
    output[257] = 0x00;
    vectors.push((input, output));

    // Full run closed by a zero.
    let input: Vec<u8> = (0..255).map(|i| ((i + 2) % 256) as u8).collect();
    let mut output: Vec<u8> = (0..258).map(|i| ((i + 1) % 256) as u8).collect();
    output[0] = 0xFF;
    output[255] = 0x01;
    output[256] = 0x01;
    output[257] = 0x00;
    vectors.push((input, output));

    // 253 non-zero bytes, a zero, then one more byte.
    let input: Vec<u8> = (0..255).map(|i| ((i + 3) % 256) as u8).collect();
    let mut output: Vec<u8> = (0..257).map(|i| ((i + 2) % 256) as u8).collect();
    output[0] = 0xFE;
    output[254] = 0x02;
    output[255] = 0x01;
    output[256] = 0x00;
    vectors.push((input, output));

    vectors
}
