use crate::core::archive::{CompressionMethod, DosDateTime, Entry};
use crate::core::error::{Result, ZipDocError};
use crate::formats::zip::constants::*;
use crate::formats::zip::utils::{field_len, put_u16, put_u32, ByteReader};

/// The central directory: one record per entry, in archive order.
#[derive(Debug, Clone, Default)]
pub struct CentralDirectory {
    pub entries: Vec<Entry>,
}

impl CentralDirectory {
    /// Parse `count` records from `data`, which must be exactly the
    /// directory's bytes.
    pub fn read(data: &[u8], count: usize) -> Result<Self> {
        let mut reader = ByteReader::new(data, "central directory");
        let mut entries = Vec::with_capacity(count);

        for index in 0..count {
            let entry = read_record(&mut reader).map_err(|e| match e {
                ZipDocError::MalformedArchive(msg) => {
                    ZipDocError::malformed(format!("central directory record {}: {}", index, msg))
                }
                other => other,
            })?;
            entries.push(entry);
        }

        Ok(CentralDirectory { entries })
    }

    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        for entry in &self.entries {
            write_record(entry, out)?;
        }
        Ok(())
    }
}

fn read_record(r: &mut ByteReader<'_>) -> Result<Entry> {
    r.expect_signature(&CENTRAL_HEADER_SIGNATURE)?;

    let version_made_by = r.u16()?;
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
    let comment_len = r.u16()? as usize;
    let disk_start = r.u16()?;
    let internal_attributes = r.u16()?;
    let external_attributes = r.u32()?;
    let header_offset = r.u32()?;

    let name = r.bytes(name_len)?.to_vec();
    let extra = r.bytes(extra_len)?.to_vec();
    let comment = r.bytes(comment_len)?.to_vec();

    if disk_start != 0 && disk_start != ZIP64_SENTINEL_16 {
        return Err(ZipDocError::malformed(format!(
            "entry '{}' starts on disk {}",
            String::from_utf8_lossy(&name),
            disk_start
        )));
    }
    if compressed_size == ZIP64_SENTINEL_32
        || uncompressed_size == ZIP64_SENTINEL_32
        || header_offset == ZIP64_SENTINEL_32
        || disk_start == ZIP64_SENTINEL_16
    {
        return Err(ZipDocError::malformed(format!(
            "entry '{}' uses ZIP64 fields",
            String::from_utf8_lossy(&name)
        )));
    }

    Ok(Entry {
        name,
        modified: DosDateTime::new(time, date),
        version_made_by,
        version_needed,
        flags,
        method,
        crc32,
        compressed_size,
        uncompressed_size,
        internal_attributes,
        external_attributes,
        extra,
        comment,
        header_offset,
    })
}

fn write_record(entry: &Entry, out: &mut Vec<u8>) -> Result<()> {
    let name_len = field_len(entry.name.len(), "entry name")?;
    let extra_len = field_len(entry.extra.len(), "extra field")?;
    let comment_len = field_len(entry.comment.len(), "entry comment")?;

    out.extend_from_slice(&CENTRAL_HEADER_SIGNATURE);
    put_u16(out, entry.version_made_by);
    put_u16(out, entry.version_needed);
    put_u16(out, entry.flags);
    put_u16(out, entry.method.into());
    put_u16(out, entry.modified.time);
    put_u16(out, entry.modified.date);
    put_u32(out, entry.crc32);
    put_u32(out, entry.compressed_size);
    put_u32(out, entry.uncompressed_size);
    put_u16(out, name_len);
    put_u16(out, extra_len);
    put_u16(out, comment_len);
    put_u16(out, 0); // disk number start
    put_u16(out, entry.internal_attributes);
    put_u32(out, entry.external_attributes);
    put_u32(out, entry.header_offset);
    out.extend_from_slice(&entry.name);
    out.extend_from_slice(&entry.extra);
    out.extend_from_slice(&entry.comment);
    Ok(())
}
