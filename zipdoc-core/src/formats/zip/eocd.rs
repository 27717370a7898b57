use crate::core::error::{Result, ZipDocError};
use crate::formats::zip::constants::*;
use crate::formats::zip::utils::{field_len, put_u16, put_u32, ByteReader};

/// End of central directory record, the archive's footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub central_dir_disk: u16,
    pub entries_on_disk: u16,
    pub total_entries: u16,
    pub central_dir_size: u32,
    pub central_dir_offset: u32,
    pub comment: Vec<u8>,
}

impl EndOfCentralDirectory {
    /// Find the footer by scanning backwards from the end of `data`.
    ///
    /// Returns the record and its offset. The last signature whose comment
    /// fits inside the buffer wins, which tolerates both trailing garbage and
    /// a `PK\x05\x06` byte pattern inside the comment itself.
    pub fn locate(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < EOCD_SIZE {
            return Err(ZipDocError::malformed(format!(
                "{} bytes is too short for a ZIP archive",
                data.len()
            )));
        }

        let last = data.len() - EOCD_SIZE;
        let first = last.saturating_sub(MAX_COMMENT_SIZE);

        for pos in (first..=last).rev() {
            if data[pos..pos + 4] != EOCD_SIGNATURE {
                continue;
            }
            // Comment length is the last fixed field
            let comment_len = u16::from_le_bytes([data[pos + 20], data[pos + 21]]) as usize;
            if pos + EOCD_SIZE + comment_len > data.len() {
                continue;
            }
            let eocd = Self::read(data, pos)?;
            eocd.check_supported(data, pos)?;
            return Ok((eocd, pos));
        }

        Err(ZipDocError::malformed("end of central directory record not found"))
    }

    pub fn read(data: &[u8], pos: usize) -> Result<Self> {
        let mut r = ByteReader::at(data, pos, "end of central directory")?;
        r.expect_signature(&EOCD_SIGNATURE)?;

        let disk_number = r.u16()?;
        let central_dir_disk = r.u16()?;
        let entries_on_disk = r.u16()?;
        let total_entries = r.u16()?;
        let central_dir_size = r.u32()?;
        let central_dir_offset = r.u32()?;
        let comment_len = r.u16()? as usize;
        let comment = r.bytes(comment_len)?.to_vec();

        Ok(EndOfCentralDirectory {
            disk_number,
            central_dir_disk,
            entries_on_disk,
            total_entries,
            central_dir_size,
            central_dir_offset,
            comment,
        })
    }

    fn check_supported(&self, data: &[u8], pos: usize) -> Result<()> {
        if self.disk_number != 0 || self.central_dir_disk != 0 {
            return Err(ZipDocError::malformed("multi-disk archives are not supported"));
        }
        if self.entries_on_disk != self.total_entries {
            return Err(ZipDocError::malformed(format!(
                "entry count mismatch: {} on disk, {} total",
                self.entries_on_disk, self.total_entries
            )));
        }
        if self.total_entries == ZIP64_SENTINEL_16
            || self.central_dir_size == ZIP64_SENTINEL_32
            || self.central_dir_offset == ZIP64_SENTINEL_32
        {
            return Err(ZipDocError::malformed("ZIP64 archives are not supported"));
        }
        if pos >= ZIP64_LOCATOR_SIZE
            && data[pos - ZIP64_LOCATOR_SIZE..pos - ZIP64_LOCATOR_SIZE + 4] == ZIP64_LOCATOR_SIGNATURE
        {
            return Err(ZipDocError::malformed("ZIP64 archives are not supported"));
        }
        Ok(())
    }

    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        let comment_len = field_len(self.comment.len(), "archive comment")?;

        out.extend_from_slice(&EOCD_SIGNATURE);
        put_u16(out, self.disk_number);
        put_u16(out, self.central_dir_disk);
        put_u16(out, self.entries_on_disk);
        put_u16(out, self.total_entries);
        put_u32(out, self.central_dir_size);
        put_u32(out, self.central_dir_offset);
        put_u16(out, comment_len);
        out.extend_from_slice(&self.comment);
        Ok(())
    }
}
