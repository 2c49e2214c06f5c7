//! Error types for the codec.
//!
//! One enum covers every fallible surface: encode-side invalid-argument
//! refusals and decode-side shape mismatches. One variant per failure kind,
//! each with a `#[error(...)]` message, and `#[from]` where a lower layer's
//! error composes cleanly.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FirmataError>;

/// Everything that can go wrong building or interpreting Firmata wire bytes.
#[derive(Debug, Error)]
pub enum FirmataError {
    /// An encoder-side argument fell outside the protocol's legal range
    /// (device id, group id, interface name, missing mandatory pin).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A decoder found a SysEx payload shape it could not fully interpret.
    #[error("parse error `{0}`: {1:?}")]
    ParseError(&'static str, Vec<u8>),

    /// UTF-8 decoding failed while interpreting a string payload.
    #[error("utf8 parse error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// A requested protocol version tag is not known to this crate.
    #[error("unknown protocol version tag `{0}`")]
    UnknownVersion(String),
}
