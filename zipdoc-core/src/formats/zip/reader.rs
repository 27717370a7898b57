use log::debug;

use crate::codecs::decode_entry;
use crate::core::archive::{Archive, Entry};
use crate::core::error::{Result, ZipDocError};
use crate::formats::zip::directory::CentralDirectory;
use crate::formats::zip::eocd::EndOfCentralDirectory;
use crate::formats::zip::header::LocalFileHeader;

/// Reader over an archive held in memory.
///
/// Construction parses only the footer and central directory; entry data is
/// located and decoded one entry at a time by [`ZipReader::read_entry`].
pub struct ZipReader<'a> {
    data: &'a [u8],
    archive: Archive,
    /// Bytes in front of the archive proper (self-extractor stub, etc.)
    base_offset: usize,
}

impl<'a> ZipReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        // 1. Footer
        let (eocd, eocd_pos) = EndOfCentralDirectory::locate(data)?;

        // 2. Where the directory really is versus where the footer says it is
        let dir_size = eocd.central_dir_size as usize;
        let dir_start = eocd_pos.checked_sub(dir_size).ok_or_else(|| {
            ZipDocError::malformed(format!(
                "central directory size {} exceeds the {} bytes before the footer",
                dir_size, eocd_pos
            ))
        })?;
        let base_offset = dir_start
            .checked_sub(eocd.central_dir_offset as usize)
            .ok_or_else(|| {
                ZipDocError::malformed(format!(
                    "central directory offset {} is past its actual position {}",
                    eocd.central_dir_offset, dir_start
                ))
            })?;
        if base_offset > 0 {
            debug!("zipdoc: {} bytes of data precede the archive", base_offset);
        }

        // 3. Directory
        let directory = CentralDirectory::read(&data[dir_start..eocd_pos], eocd.total_entries as usize)?;

        Ok(ZipReader {
            data,
            archive: Archive {
                entries: directory.entries,
                comment: eocd.comment,
            },
            base_offset,
        })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.archive.entries
    }

    pub fn comment(&self) -> &[u8] {
        &self.archive.comment
    }

    pub fn len(&self) -> usize {
        self.archive.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.entries.is_empty()
    }

    /// Decoded content of the entry at `index`, checked against the
    /// directory's size and CRC.
    pub fn read_entry(&self, index: usize) -> Result<Vec<u8>> {
        let entry = self.archive.entries.get(index).ok_or_else(|| {
            ZipDocError::malformed(format!("entry index {} out of range ({} entries)", index, self.len()))
        })?;
        let name = entry.name_lossy();

        if entry.is_encrypted() {
            return Err(ZipDocError::UnsupportedMethod {
                name: name.into_owned(),
                method: "encrypted".to_string(),
            });
        }

        let raw = self.raw_data(entry)?;
        let content = decode_entry(&name, entry.method, raw, entry.uncompressed_size as usize)?;

        if content.len() != entry.uncompressed_size as usize {
            return Err(ZipDocError::corrupt(
                name,
                format!(
                    "size mismatch: directory says {} bytes, data holds {}{}",
                    entry.uncompressed_size,
                    content.len(),
                    if content.len() > entry.uncompressed_size as usize { " or more" } else { "" }
                ),
            ));
        }

        let crc = crc32fast::hash(&content);
        if crc != entry.crc32 {
            return Err(ZipDocError::corrupt(
                name,
                format!("CRC mismatch: directory says {:08x}, data hashes to {:08x}", entry.crc32, crc),
            ));
        }

        Ok(content)
    }

    /// Content of the entry called `name`. Duplicate names resolve to the
    /// last record, as most readers do.
    pub fn read_by_name(&self, name: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.archive.entries.iter().rposition(|e| e.name == name) {
            Some(index) => self.read_entry(index).map(Some),
            None => Ok(None),
        }
    }

    /// The entry's stored bytes exactly as they sit in the archive.
    fn raw_data(&self, entry: &Entry) -> Result<&'a [u8]> {
        let header_pos = self.base_offset + entry.header_offset as usize;
        let (local, data_start) = LocalFileHeader::read(self.data, header_pos)?;

        if local.name != entry.name {
            return Err(ZipDocError::malformed(format!(
                "file name in directory '{}' and header '{}' differ",
                entry.name_lossy(),
                String::from_utf8_lossy(&local.name)
            )));
        }

        let data_end = data_start + entry.compressed_size as usize;
        if data_end > self.data.len() {
            return Err(ZipDocError::malformed(format!(
                "truncated data for '{}': needs bytes {}..{}, archive has {}",
                entry.name_lossy(),
                data_start,
                data_end,
                self.data.len()
            )));
        }
        Ok(&self.data[data_start..data_end])
    }
}
