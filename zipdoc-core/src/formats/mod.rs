//! On-disk archive formats

pub mod zip;
