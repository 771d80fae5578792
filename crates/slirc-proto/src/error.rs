//! Error types for the IRC wire layer.
//!
//! Line decoding is deliberately infallible, so the only failures this crate
//! can produce come from configuring the text codec.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The requested character encoding label is not known to `encoding_rs`.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}
