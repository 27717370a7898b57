//! Archive model and error types shared by the codec and the transcoder

pub mod archive;
pub mod error;
