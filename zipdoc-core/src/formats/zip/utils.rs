use crate::core::error::{Result, ZipDocError};

/// Bounds-checked little-endian cursor over an in-memory archive.
///
/// Every read past the end of the slice becomes a `MalformedArchive` error
/// naming the record being parsed, so truncated input never panics.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], what: &'static str) -> Self {
        Self { data, pos: 0, what }
    }

    /// Reader positioned at `offset`, which may be at most `data.len()`.
    pub fn at(data: &'a [u8], offset: usize, what: &'static str) -> Result<Self> {
        if offset > data.len() {
            return Err(ZipDocError::malformed(format!(
                "{} offset {} is past end of data ({} bytes)",
                what,
                offset,
                data.len()
            )));
        }
        Ok(Self { data, pos: offset, what })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(ZipDocError::malformed(format!(
                "truncated {}: need {} bytes at offset {}, have {}",
                self.what,
                len,
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn u16(&mut self) -> Result<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn expect_signature(&mut self, signature: &[u8; 4]) -> Result<()> {
        let start = self.pos;
        let sig = self.bytes(4)?;
        if sig != signature {
            return Err(ZipDocError::malformed(format!(
                "bad {} signature {:02x?} at offset {}",
                self.what, sig, start
            )));
        }
        Ok(())
    }
}

pub fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Length of a variable field as the u16 the headers store.
pub fn field_len(len: usize, what: &str) -> Result<u16> {
    u16::try_from(len)
        .map_err(|_| ZipDocError::ArchiveTooLarge(format!("{} is {} bytes (max 65535)", what, len)))
}

/// Removes extra-field records with the given header id.
///
/// Extra data is a sequence of `(id: u16, len: u16, payload)` records. If the
/// sequence does not parse cleanly the bytes are returned unchanged.
pub fn strip_extra_field(extra: &[u8], header_id: u16) -> Vec<u8> {
    let mut out = Vec::with_capacity(extra.len());
    let mut pos = 0;
    while pos + 4 <= extra.len() {
        let id = u16::from_le_bytes([extra[pos], extra[pos + 1]]);
        let len = u16::from_le_bytes([extra[pos + 2], extra[pos + 3]]) as usize;
        let end = pos + 4 + len;
        if end > extra.len() {
            return extra.to_vec();
        }
        if id != header_id {
            out.extend_from_slice(&extra[pos..end]);
        }
        pos = end;
    }
    if pos != extra.len() {
        return extra.to_vec();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_reader_little_endian() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut r = ByteReader::new(&data, "test");
        assert_eq!(r.u16().unwrap(), 0x1234);
        assert_eq!(r.u32().unwrap(), 0x1234_5678);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_byte_reader_truncated() {
        let data = [0x01, 0x02, 0x03];
        let mut r = ByteReader::new(&data, "local header");
        assert!(r.u16().is_ok());
        let err = r.u32().unwrap_err();
        assert!(matches!(err, ZipDocError::MalformedArchive(_)));
        assert!(err.to_string().contains("local header"));
    }

    #[test]
    fn test_reader_offset_past_end() {
        let data = [0u8; 4];
        assert!(ByteReader::at(&data, 4, "x").is_ok());
        assert!(ByteReader::at(&data, 5, "x").is_err());
    }

    #[test]
    fn test_strip_zip64_extra() {
        let mut extra = Vec::new();
        // ZIP64 record with 8 payload bytes
        put_u16(&mut extra, 0x0001);
        put_u16(&mut extra, 8);
        extra.extend_from_slice(&[0u8; 8]);
        // extended timestamp record
        put_u16(&mut extra, 0x5455);
        put_u16(&mut extra, 5);
        extra.extend_from_slice(&[1, 2, 3, 4, 5]);

        let stripped = strip_extra_field(&extra, 0x0001);
        assert_eq!(stripped, &extra[12..]);
    }

    #[test]
    fn test_strip_extra_keeps_unparseable() {
        let extra = vec![0x01, 0x00, 0xFF];
        assert_eq!(strip_extra_field(&extra, 0x0001), extra);
    }
}
