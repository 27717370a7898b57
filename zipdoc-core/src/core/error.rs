//! Error type for zipdoc-core

use thiserror::Error;

/// Errors raised while parsing, re-encoding or configuring.
///
/// The first three variants are the transcoder's failure kinds. The
/// pass-through guard turns every one of them into an unchanged copy of the
/// input, so callers of [`crate::encode`]/[`crate::decode`] never see them.
#[derive(Debug, Error)]
pub enum ZipDocError {
    #[error("Malformed ZIP archive: {0}")]
    MalformedArchive(String),

    #[error("Corrupt entry '{name}': {reason}")]
    CorruptEntry { name: String, reason: String },

    #[error("Unsupported compression method {method} for entry '{name}'")]
    UnsupportedMethod { name: String, method: String },

    #[error("Archive too large for a classic ZIP: {0}")]
    ArchiveTooLarge(String),

    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ZipDocError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        ZipDocError::MalformedArchive(msg.into())
    }

    pub(crate) fn corrupt(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ZipDocError::CorruptEntry {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZipDocError>;
