#![allow(dead_code)]
//! A byte-stream encoder/decoder for the [Firmata protocol]. This crate owns
//! wire framing, numeric sub-encodings, and per-feature SysEx dispatch; it
//! does not own a transport, a board's pin/state model, or a scheduler —
//! callers drive [`session::CodecSession`] from whatever connection they
//! have.
//!
//! [Firmata protocol]: https://github.com/firmata/protocol

pub mod constants;
pub mod error;
pub mod numeric;
pub mod parser;
pub mod pin;
pub mod request;
pub mod session;
pub mod sysex;
pub mod version;

pub use error::{FirmataError, Result};
pub use session::{CodecSession, DecodedMessage};
pub use version::ProtocolVersion;
