use crate::codecs::{encode_entry, DEFAULT_LEVEL};
use crate::core::archive::{CompressionMethod, Entry};
use crate::core::error::{Result, ZipDocError};
use crate::formats::zip::constants::*;
use crate::formats::zip::directory::CentralDirectory;
use crate::formats::zip::eocd::EndOfCentralDirectory;
use crate::formats::zip::header::LocalFileHeader;
use crate::formats::zip::utils::strip_extra_field;

/// Flags that describe the old physical encoding and must not carry over
const PHYSICAL_FLAGS: u16 = FLAG_ENCRYPTED | FLAG_DEFLATE_OPTIONS | FLAG_DATA_DESCRIPTOR | FLAG_STRONG_ENCRYPTION;

/// Builds an archive in memory.
///
/// Sizes and CRC always go into the local header, so the output never
/// contains data descriptors.
pub struct ZipWriter {
    out: Vec<u8>,
    entries: Vec<Entry>,
    level: u32,
}

impl Default for ZipWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipWriter {
    pub fn new() -> Self {
        Self::with_level(DEFAULT_LEVEL)
    }

    /// Writer using deflate level `level` (0-9) for deflated entries.
    pub fn with_level(level: u32) -> Self {
        ZipWriter {
            out: Vec::new(),
            entries: Vec::new(),
            level,
        }
    }

    /// Append one entry.
    ///
    /// Descriptive metadata (name, time, attributes, comment, extra fields,
    /// version made by, remaining flags) comes from `template`; CRC, sizes,
    /// method and offset are computed here.
    pub fn add_entry(&mut self, template: &Entry, content: &[u8], method: CompressionMethod) -> Result<()> {
        let name = template.name_lossy();
        let raw = encode_entry(&name, method, content, self.level)?;

        let header_offset = to_u32(self.out.len(), "local header offset")?;
        let uncompressed_size = to_u32(content.len(), "uncompressed size")?;
        let compressed_size = to_u32(raw.len(), "compressed size")?;

        let mut entry = template.clone();
        entry.method = method;
        entry.flags = template.flags & !PHYSICAL_FLAGS;
        entry.version_needed = match method {
            CompressionMethod::Stored if !template.is_dir() => VERSION_STORED,
            _ => VERSION_DEFLATE,
        };
        entry.crc32 = crc32fast::hash(content);
        entry.compressed_size = compressed_size;
        entry.uncompressed_size = uncompressed_size;
        entry.header_offset = header_offset;
        entry.extra = strip_extra_field(&template.extra, EXTRA_ZIP64);

        LocalFileHeader::for_entry(&entry).write(&mut self.out)?;
        self.out.extend_from_slice(&raw);
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Write the central directory and footer, returning the archive bytes.
    pub fn finish(mut self, comment: &[u8]) -> Result<Vec<u8>> {
        let total_entries = u16::try_from(self.entries.len()).map_err(|_| {
            ZipDocError::ArchiveTooLarge(format!("{} entries (max 65534 without ZIP64)", self.entries.len()))
        })?;
        if total_entries == ZIP64_SENTINEL_16 {
            return Err(ZipDocError::ArchiveTooLarge("65535 entries needs ZIP64".to_string()));
        }

        let dir_start = self.out.len();
        let central_dir_offset = to_u32(dir_start, "central directory offset")?;

        let directory = CentralDirectory {
            entries: std::mem::take(&mut self.entries),
        };
        directory.write(&mut self.out)?;
        let central_dir_size = to_u32(self.out.len() - dir_start, "central directory size")?;

        let eocd = EndOfCentralDirectory {
            disk_number: 0,
            central_dir_disk: 0,
            entries_on_disk: total_entries,
            total_entries,
            central_dir_size,
            central_dir_offset,
            comment: comment.to_vec(),
        };
        eocd.write(&mut self.out)?;

        Ok(self.out)
    }
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    // 0xFFFFFFFF is the ZIP64 marker and cannot be a real value
    match u32::try_from(value) {
        Ok(v) if v != ZIP64_SENTINEL_32 => Ok(v),
        _ => Err(ZipDocError::ArchiveTooLarge(format!("{} {} does not fit in 32 bits", what, value))),
    }
}
