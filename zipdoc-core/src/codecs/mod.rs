//! Entry payload codecs

pub mod deflate;

pub use deflate::{compress_deflate, decompress_deflate, DEFAULT_LEVEL};

use crate::core::archive::CompressionMethod;
use crate::core::error::{Result, ZipDocError};

/// Recover an entry's content from its raw stored bytes.
///
/// `expected_size` is the uncompressed size from the central directory; the
/// caller checks the result against it.
pub fn decode_entry(name: &str, method: CompressionMethod, data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    match method {
        CompressionMethod::Stored => Ok(data.to_vec()),
        CompressionMethod::Deflated => decompress_deflate(data, expected_size)
            .map_err(|e| ZipDocError::corrupt(name, format!("inflate failed: {}", e))),
        CompressionMethod::Other(code) => Err(ZipDocError::UnsupportedMethod {
            name: name.to_string(),
            method: method_name(code).to_string(),
        }),
    }
}

/// Encode content for the given target method.
pub fn encode_entry(name: &str, method: CompressionMethod, data: &[u8], level: u32) -> Result<Vec<u8>> {
    match method {
        CompressionMethod::Stored => Ok(data.to_vec()),
        CompressionMethod::Deflated => Ok(compress_deflate(data, level)?),
        CompressionMethod::Other(code) => Err(ZipDocError::UnsupportedMethod {
            name: name.to_string(),
            method: method_name(code).to_string(),
        }),
    }
}

/// Human-readable name for a PKWARE method code.
pub fn method_name(code: u16) -> &'static str {
    match code {
        0 => "stored",
        1 => "shrink",
        6 => "implode",
        8 => "deflate",
        9 => "deflate64",
        12 => "bzip2",
        14 => "lzma",
        93 => "zstd",
        95 => "xz",
        98 => "ppmd",
        99 => "aes",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method_rejected() {
        let err = decode_entry("a.bin", CompressionMethod::Other(12), b"BZh", 3).unwrap_err();
        match err {
            ZipDocError::UnsupportedMethod { name, method } => {
                assert_eq!(name, "a.bin");
                assert_eq!(method, "bzip2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_garbage_deflate_is_corrupt() {
        let err = decode_entry("x.xml", CompressionMethod::Deflated, &[0xFF; 16], 100).unwrap_err();
        assert!(matches!(err, ZipDocError::CorruptEntry { .. }));
    }

    #[test]
    fn test_encode_decode_both_methods() {
        let data = b"<w:document><w:body/></w:document>".repeat(10);
        for method in [CompressionMethod::Stored, CompressionMethod::Deflated] {
            let raw = encode_entry("d.xml", method, &data, DEFAULT_LEVEL).unwrap();
            let back = decode_entry("d.xml", method, &raw, data.len()).unwrap();
            assert_eq!(back, data);
        }
    }
}
