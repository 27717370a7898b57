//! zipdoc core library - stored/deflated re-encoding of ZIP archives
//!
//! Zipped document formats (docx, xlsx, odt, ...) delta badly inside a
//! version-control system because a small edit reshuffles most of the
//! deflate stream. This crate rewrites such archives so that every entry is
//! stored uncompressed (for the repository) or deflated (for the working
//! copy) without touching names, timestamps, attributes or content.

pub mod codecs;
pub mod core;
pub mod filters;
pub mod formats;
pub mod guard;
pub mod transcode;
pub mod xml;

pub use crate::core::archive::{Archive, CompressionMethod, DosDateTime, Entry, TranscodeMode};
pub use crate::core::error::{Result, ZipDocError};
pub use filters::{Direction, FilterConfig, FilterName, FilterRule, FilterSet};
pub use formats::zip::{reader::ZipReader, writer::ZipWriter};
pub use guard::{decode, encode, FilterOutcome, FilterStatus, PassthroughGuard};
pub use transcode::{transcode, TranscodeOptions, Transcoder};
