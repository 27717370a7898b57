
pub const LOCAL_HEADER_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04]; // "PK\x03\x04"
pub const CENTRAL_HEADER_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x01, 0x02]; // "PK\x01\x02"
pub const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x05, 0x06]; // "PK\x05\x06"
pub const ZIP64_LOCATOR_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x06, 0x07]; // "PK\x06\x07"

/// Fixed part of each record, signature included
pub const LOCAL_HEADER_SIZE: usize = 30;
pub const CENTRAL_HEADER_SIZE: usize = 46;
pub const EOCD_SIZE: usize = 22;
pub const ZIP64_LOCATOR_SIZE: usize = 20;

/// Longest EOCD comment, bounds the backward signature scan
pub const MAX_COMMENT_SIZE: usize = u16::MAX as usize;

pub const FLAG_ENCRYPTED: u16 = 0x0001;
pub const FLAG_DEFLATE_OPTIONS: u16 = 0x0006;
pub const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
pub const FLAG_STRONG_ENCRYPTION: u16 = 0x0040;

pub const VERSION_STORED: u16 = 10;
pub const VERSION_DEFLATE: u16 = 20;

/// Extra-field header id of the ZIP64 extended information record
pub const EXTRA_ZIP64: u16 = 0x0001;

pub const ZIP64_SENTINEL_16: u16 = 0xFFFF;
pub const ZIP64_SENTINEL_32: u32 = 0xFFFF_FFFF;
