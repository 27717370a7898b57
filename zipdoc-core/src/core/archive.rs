use std::borrow::Cow;
use std::fmt;

/// Compression method recorded for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Method 0, raw bytes
    Stored,
    /// Method 8, raw deflate stream
    Deflated,
    /// Anything else (bzip2, lzma, zstd, AES marker, ...)
    Other(u16),
}

impl From<u16> for CompressionMethod {
    fn from(v: u16) -> Self {
        match v {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflated,
            other => CompressionMethod::Other(other),
        }
    }
}

impl From<CompressionMethod> for u16 {
    fn from(val: CompressionMethod) -> Self {
        match val {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflated => 8,
            CompressionMethod::Other(v) => v,
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMethod::Stored => write!(f, "stored"),
            CompressionMethod::Deflated => write!(f, "deflated"),
            CompressionMethod::Other(v) => write!(f, "method {}", v),
        }
    }
}

/// MS-DOS packed modification time, kept exactly as found on disk.
///
/// The fields are never normalized: an out-of-range date written by some
/// other tool is copied back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DosDateTime {
    pub time: u16,
    pub date: u16,
}

impl DosDateTime {
    pub fn new(time: u16, date: u16) -> Self {
        Self { time, date }
    }

    /// Pack calendar fields. Seconds are stored with two-second resolution.
    pub fn from_parts(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        let date = (year.saturating_sub(1980) << 9) | ((month as u16) << 5) | day as u16;
        let time = ((hour as u16) << 11) | ((minute as u16) << 5) | (second as u16 / 2);
        Self { time, date }
    }

    pub fn year(&self) -> u16 {
        (self.date >> 9) + 1980
    }

    pub fn month(&self) -> u8 {
        ((self.date >> 5) & 0x0F) as u8
    }

    pub fn day(&self) -> u8 {
        (self.date & 0x1F) as u8
    }

    pub fn hour(&self) -> u8 {
        (self.time >> 11) as u8
    }

    pub fn minute(&self) -> u8 {
        ((self.time >> 5) & 0x3F) as u8
    }

    pub fn second(&self) -> u8 {
        ((self.time & 0x1F) * 2) as u8
    }
}

impl fmt::Display for DosDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// One central-directory entry.
///
/// `name`, `extra` and `comment` hold raw bytes; the archive may use CP437
/// or UTF-8 names and we never re-encode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: Vec<u8>,
    pub modified: DosDateTime,
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub method: CompressionMethod,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub internal_attributes: u16,
    pub external_attributes: u32,
    pub extra: Vec<u8>,
    pub comment: Vec<u8>,
    /// Offset of the local header as recorded in the central directory
    pub header_offset: u32,
}

impl Entry {
    /// Fresh entry with the defaults a Unix-hosted writer would use.
    pub fn new(name: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            modified: DosDateTime::from_parts(1980, 1, 1, 0, 0, 0),
            version_made_by: (3 << 8) | 20,
            version_needed: 20,
            flags: 0,
            method: CompressionMethod::Stored,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            internal_attributes: 0,
            external_attributes: 0,
            extra: Vec::new(),
            comment: Vec::new(),
            header_offset: 0,
        }
    }

    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn is_dir(&self) -> bool {
        self.name.last() == Some(&b'/')
    }

    /// Traditional or strong encryption.
    pub fn is_encrypted(&self) -> bool {
        use crate::formats::zip::constants::{FLAG_ENCRYPTED, FLAG_STRONG_ENCRYPTION};
        self.flags & (FLAG_ENCRYPTED | FLAG_STRONG_ENCRYPTION) != 0
    }
}

/// A parsed archive: entries in central-directory order plus the trailing comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    pub entries: Vec<Entry>,
    pub comment: Vec<u8>,
}

/// Target physical encoding for a transcode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeMode {
    /// Repository form: every entry stored uncompressed
    ToStored,
    /// Working-copy form: every entry deflated
    ToCompressed,
}

impl TranscodeMode {
    pub fn target_method(self) -> CompressionMethod {
        match self {
            TranscodeMode::ToStored => CompressionMethod::Stored,
            TranscodeMode::ToCompressed => CompressionMethod::Deflated,
        }
    }

    /// Gerund used in log lines ("encoding" / "decoding").
    pub fn action(self) -> &'static str {
        match self {
            TranscodeMode::ToStored => "encoding",
            TranscodeMode::ToCompressed => "decoding",
        }
    }

    pub fn done(self) -> &'static str {
        match self {
            TranscodeMode::ToStored => "Encoded",
            TranscodeMode::ToCompressed => "Decoded",
        }
    }
}
