//! Re-encode every entry of an archive to one compression method
//!
//! Names, timestamps, attributes, comments and entry order are copied from
//! the input; only the physical encoding of each entry changes.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::codecs::DEFAULT_LEVEL;
use crate::core::archive::TranscodeMode;
use crate::core::error::Result;
use crate::formats::zip::reader::ZipReader;
use crate::formats::zip::writer::ZipWriter;
use crate::xml;

/// Knobs for a transcode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeOptions {
    /// Deflate level (0-9) used when compressing
    pub level: u32,
    /// Break `><` into separate lines in `*.xml` parts of the stored form
    pub xml_line_breaks: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            xml_line_breaks: false,
        }
    }
}

/// Stateless transcoder; one value can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    options: TranscodeOptions,
}

impl Transcoder {
    pub fn new(options: TranscodeOptions) -> Self {
        Self { options }
    }

    /// Rewrite `input` so that every entry uses `mode`'s method.
    ///
    /// Entries already in the target method are decoded and re-encoded like
    /// any other. Fails without partial output on the first bad entry.
    pub fn transcode(&self, input: &[u8], mode: TranscodeMode) -> Result<Vec<u8>> {
        let reader = ZipReader::new(input)?;
        let target = mode.target_method();
        let mut writer = ZipWriter::with_level(self.options.level);

        for (index, entry) in reader.entries().iter().enumerate() {
            let mut content = reader.read_entry(index)?;

            if self.options.xml_line_breaks && xml::is_xml_part(&entry.name) {
                content = xml::rewrite(content, mode);
            }

            trace!(
                "zipdoc: {} {} -> {} ({} bytes)",
                entry.name_lossy(),
                entry.method,
                target,
                content.len()
            );
            writer.add_entry(entry, &content, target)?;
        }

        writer.finish(reader.comment())
    }
}

/// Transcode with explicit options; see [`Transcoder::transcode`].
pub fn transcode(input: &[u8], mode: TranscodeMode, options: &TranscodeOptions) -> Result<Vec<u8>> {
    Transcoder::new(*options).transcode(input, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::archive::{CompressionMethod, Entry};
    use crate::core::error::ZipDocError;

    fn sample(method: CompressionMethod) -> Vec<u8> {
        let mut writer = ZipWriter::new();
        writer.add_entry(&Entry::new("word/"), b"", method).unwrap();
        writer
            .add_entry(&Entry::new("word/document.xml"), b"<w:document><w:body/></w:document>", method)
            .unwrap();
        writer.add_entry(&Entry::new("media/image1.png"), &[0x89, b'P', b'N', b'G', 0, 1, 2], method).unwrap();
        writer.finish(b"").unwrap()
    }

    fn methods(data: &[u8]) -> Vec<CompressionMethod> {
        ZipReader::new(data).unwrap().entries().iter().map(|e| e.method).collect()
    }

    #[test]
    fn test_modes_force_methods() {
        let options = TranscodeOptions::default();
        let stored = transcode(&sample(CompressionMethod::Deflated), TranscodeMode::ToStored, &options).unwrap();
        assert_eq!(methods(&stored), vec![CompressionMethod::Stored; 3]);

        let deflated = transcode(&sample(CompressionMethod::Stored), TranscodeMode::ToCompressed, &options).unwrap();
        assert_eq!(methods(&deflated), vec![CompressionMethod::Deflated; 3]);
    }

    #[test]
    fn test_same_mode_is_byte_identical() {
        let options = TranscodeOptions::default();
        let once = transcode(&sample(CompressionMethod::Deflated), TranscodeMode::ToStored, &options).unwrap();
        let twice = transcode(&once, TranscodeMode::ToStored, &options).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_xml_line_breaks_only_touch_xml() {
        let options = TranscodeOptions {
            xml_line_breaks: true,
            ..TranscodeOptions::default()
        };
        let stored = transcode(&sample(CompressionMethod::Deflated), TranscodeMode::ToStored, &options).unwrap();
        let reader = ZipReader::new(&stored).unwrap();
        assert_eq!(
            reader.read_by_name(b"word/document.xml").unwrap().unwrap(),
            b"<w:document>\r\n <w:body/>\r\n </w:document>"
        );
        assert_eq!(
            reader.read_by_name(b"media/image1.png").unwrap().unwrap(),
            [0x89, b'P', b'N', b'G', 0, 1, 2]
        );

        let restored = transcode(&stored, TranscodeMode::ToCompressed, &options).unwrap();
        let reader = ZipReader::new(&restored).unwrap();
        assert_eq!(
            reader.read_by_name(b"word/document.xml").unwrap().unwrap(),
            b"<w:document><w:body/></w:document>"
        );
    }

    #[test]
    fn test_not_a_zip() {
        let err = transcode(b"not a zip file", TranscodeMode::ToStored, &TranscodeOptions::default()).unwrap_err();
        assert!(matches!(err, ZipDocError::MalformedArchive(_)));
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: TranscodeOptions = serde_json::from_str(r#"{ "xml_line_breaks": true }"#).unwrap();
        assert_eq!(options.level, DEFAULT_LEVEL);
        assert!(options.xml_line_breaks);
    }
}
