//! Raw deflate (ZIP method 8) via flate2

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

/// zlib's default level, a good size/speed trade-off for office documents
pub const DEFAULT_LEVEL: u32 = 6;

/// Compress `data` as a raw deflate stream (no zlib header).
pub fn compress_deflate(data: &[u8], level: u32) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(data.len() / 2 + 64), Compression::new(level.min(9)));
    encoder.write_all(data)?;
    encoder.finish()
}

/// Inflate a raw deflate stream.
///
/// At most `expected_size + 1` bytes are produced, enough for the caller to
/// notice a size mismatch without inflating an arbitrarily large bomb.
pub fn decompress_deflate(data: &[u8], expected_size: usize) -> Result<Vec<u8>, std::io::Error> {
    let decoder = DeflateDecoder::new(data);
    // Declared sizes are untrusted, cap the up-front allocation
    let mut output = Vec::with_capacity(expected_size.min(16 * 1024 * 1024));
    decoder.take(expected_size as u64 + 1).read_to_end(&mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_roundtrip() {
        let original = b"Hello, World! This is a test of raw deflate compression.";
        let compressed = compress_deflate(original, DEFAULT_LEVEL).unwrap();
        let decompressed = decompress_deflate(&compressed, original.len()).unwrap();
        assert_eq!(original.as_slice(), decompressed.as_slice());
    }

    #[test]
    fn test_deflate_levels() {
        let data = b"<row><c r=\"A1\"><v>1</v></c></row>".repeat(50);
        for level in 0..=9 {
            let compressed = compress_deflate(&data, level).unwrap();
            let decompressed = decompress_deflate(&compressed, data.len()).unwrap();
            assert_eq!(data, decompressed);
        }
    }

    #[test]
    fn test_deflate_is_deterministic() {
        let data = b"same input, same output".repeat(20);
        assert_eq!(
            compress_deflate(&data, DEFAULT_LEVEL).unwrap(),
            compress_deflate(&data, DEFAULT_LEVEL).unwrap()
        );
    }

    #[test]
    fn test_decompress_stops_after_limit() {
        let data = vec![b'a'; 10_000];
        let compressed = compress_deflate(&data, DEFAULT_LEVEL).unwrap();
        let limited = decompress_deflate(&compressed, 100).unwrap();
        assert_eq!(limited.len(), 101);
    }

    #[test]
    fn test_empty_input() {
        let compressed = compress_deflate(b"", DEFAULT_LEVEL).unwrap();
        assert!(!compressed.is_empty());
        assert!(decompress_deflate(&compressed, 0).unwrap().is_empty());
    }
}
