//! Error types for treehuff

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("bad magic number: expected {expected:#010x}, found {found:#010x}", expected = crate::HUFF_TREE)]
    BadMagicNumber { found: u32 },

    #[error("truncated stream: input ended before the end-of-stream code")]
    TruncatedStream,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("input too large: {size} bytes exceeds limit of {limit}")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompressError>;

/// True when an I/O error only means the bit source ran dry.
pub(crate) fn is_eof(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::UnexpectedEof
}
