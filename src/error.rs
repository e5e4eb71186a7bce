//! Error types for kbdocx operations.

use thiserror::Error;

/// Errors that abort an export.
///
/// Conversion itself never fails: malformed input degrades to visible
/// markers or flattened text. Only writing the package can go wrong, and
/// then no bytes are returned at all.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why an embedded image could not be decoded.
///
/// Recovered by the walker, which emits an error marker run in its place.
#[derive(Error, Debug)]
pub enum ImageDecodeError {
    #[error("not a data: URI")]
    NotDataUri,

    #[error("data URI is not base64-encoded")]
    NotBase64Encoded,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("empty image payload")]
    EmptyPayload,
}
