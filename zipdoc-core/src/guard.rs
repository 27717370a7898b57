//! Pass-through wrapper around the transcoder
//!
//! Files routed through the filter by a too-broad pattern (a symlink named
//! `x.docx`, a broken download, a password-protected workbook) must reach
//! the repository untouched. The guard returns the input unchanged on any
//! transcode error and reports what happened.

use log::{debug, info};

use crate::core::archive::TranscodeMode;
use crate::core::error::ZipDocError;
use crate::transcode::{TranscodeOptions, Transcoder};

/// What the guard did with one input.
#[derive(Debug)]
pub enum FilterStatus {
    Transcoded,
    /// Input returned as-is; the error says why
    PassedThrough(ZipDocError),
}

#[derive(Debug)]
pub struct FilterOutcome {
    pub data: Vec<u8>,
    pub status: FilterStatus,
}

impl FilterOutcome {
    pub fn is_transcoded(&self) -> bool {
        matches!(self.status, FilterStatus::Transcoded)
    }

    pub fn error(&self) -> Option<&ZipDocError> {
        match &self.status {
            FilterStatus::PassedThrough(e) => Some(e),
            FilterStatus::Transcoded => None,
        }
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[derive(Debug, Clone, Default)]
pub struct PassthroughGuard {
    transcoder: Transcoder,
}

impl PassthroughGuard {
    pub fn new(options: TranscodeOptions) -> Self {
        Self {
            transcoder: Transcoder::new(options),
        }
    }

    /// Transcode `input`, or hand it back unchanged if that fails.
    ///
    /// `name` only labels the log lines.
    pub fn filter(&self, input: &[u8], mode: TranscodeMode, name: &str) -> FilterOutcome {
        match self.transcoder.transcode(input, mode) {
            Ok(data) => {
                debug!("zipdoc: {} {}", mode.done(), name);
                FilterOutcome {
                    data,
                    status: FilterStatus::Transcoded,
                }
            }
            Err(e) => {
                info!(
                    "zipdoc: Skipped {} '{}' due to bad ZIP archive. The file is not a ZIP \
                     (might be a link) or the archive is broken: {}",
                    mode.action(),
                    name,
                    e
                );
                FilterOutcome {
                    data: input.to_vec(),
                    status: FilterStatus::PassedThrough(e),
                }
            }
        }
    }

    pub fn encode(&self, input: &[u8], name: &str) -> FilterOutcome {
        self.filter(input, TranscodeMode::ToStored, name)
    }

    pub fn decode(&self, input: &[u8], name: &str) -> FilterOutcome {
        self.filter(input, TranscodeMode::ToCompressed, name)
    }
}

/// Stored form of `input` (repository side). Never fails.
pub fn encode(input: &[u8]) -> Vec<u8> {
    PassthroughGuard::default().encode(input, "<input>").into_data()
}

/// Compressed form of `input` (working-copy side). Never fails.
pub fn decode(input: &[u8]) -> Vec<u8> {
    PassthroughGuard::default().decode(input, "<input>").into_data()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_passes_through() {
        let input = b"not a zip file";
        assert_eq!(encode(input), input);
        assert_eq!(decode(input), input);
    }

    #[test]
    fn test_outcome_reports_reason() {
        let outcome = PassthroughGuard::default().encode(b"", "empty.docx");
        assert!(!outcome.is_transcoded());
        assert!(matches!(outcome.error(), Some(ZipDocError::MalformedArchive(_))));
        assert!(outcome.data.is_empty());
    }

    #[test]
    fn test_empty_archive_transcodes() {
        let empty = crate::formats::zip::writer::ZipWriter::new().finish(b"").unwrap();
        let outcome = PassthroughGuard::default().decode(&empty, "empty.zip");
        assert!(outcome.is_transcoded());
        assert_eq!(outcome.data, empty);
    }
}
