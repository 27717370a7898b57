//! Classic (non-ZIP64) PKZIP layout: local headers, central directory, EOCD

pub mod constants;
pub mod directory;
pub mod eocd;
pub mod header;
pub mod reader;
pub mod utils;
pub mod writer;
