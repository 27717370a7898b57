use crate::core::archive::{CompressionMethod, DosDateTime, Entry};
use crate::core::error::Result;
use crate::formats::zip::constants::*;
use crate::formats::zip::utils::{field_len, put_u16, put_u32, ByteReader};

/// Header in front of each entry's data.
///
/// When flag bit 3 is set the CRC and sizes here are zero and the real
/// values follow the data in a descriptor; the reader therefore only trusts
/// the central directory for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub method: CompressionMethod,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub name: Vec<u8>,
    pub extra: Vec<u8>,
}

impl LocalFileHeader {
    /// Local header mirroring a central-directory entry.
    pub fn for_entry(entry: &Entry) -> Self {
        LocalFileHeader {
            version_needed: entry.version_needed,
            flags: entry.flags,
            method: entry.method,
            modified: entry.modified,
            crc32: entry.crc32,
            compressed_size: entry.compressed_size,
            uncompressed_size: entry.uncompressed_size,
            name: entry.name.clone(),
            extra: entry.extra.clone(),
        }
    }

    /// Parse the header at `offset`; returns it with the offset where the
    /// entry's data begins.
    pub fn read(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut r = ByteReader::at(data, offset, "local file header")?;
        r.expect_signature(&LOCAL_HEADER_SIGNATURE)?;

        let version_needed = r.u16()?;
        let flags = r.u16()?;
        let method = CompressionMethod::from(r.u16()?);
        let time = r.u16()?;
        let date = r.u16()?;
        let crc32 = r.u32()?;
        let compressed_size = r.u32()?;
        let uncompressed_size = r.u32()?;
        let name_len = r.u16()? as usize;
        let extra_len = r.u16()? as usize;
        let name = r.bytes(name_len)?.to_vec();
        let extra = r.bytes(extra_len)?.to_vec();

        let header = LocalFileHeader {
            version_needed,
            flags,
            method,
            modified: DosDateTime::new(time, date),
            crc32,
            compressed_size,
            uncompressed_size,
            name,
            extra,
        };
        Ok((header, r.position()))
    }

    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        let name_len = field_len(self.name.len(), "entry name")?;
        let extra_len = field_len(self.extra.len(), "extra field")?;

        out.extend_from_slice(&LOCAL_HEADER_SIGNATURE);
        put_u16(out, self.version_needed);
        put_u16(out, self.flags);
        put_u16(out, self.method.into());
        put_u16(out, self.modified.time);
        put_u16(out, self.modified.date);
        put_u32(out, self.crc32);
        put_u32(out, self.compressed_size);
        put_u32(out, self.uncompressed_size);
        put_u16(out, name_len);
        put_u16(out, extra_len);
        out.extend_from_slice(&self.name);
        out.extend_from_slice(&self.extra);
        Ok(())
    }

    pub fn encoded_len(&self) -> usize {
        LOCAL_HEADER_SIZE + self.name.len() + self.extra.len()
    }
}
