//! Ties the frame parser, SysEx reassembly, and dispatch together behind the
//! four surface operations: `decode`, `encode_short`, `encode_sysex`,
//! `encode_sysex_command`.
//!
//! The raw frame parser (`crate::parser`) only merges `DATA_SYSEX`
//! fragments within a single `feed` call; a SysEx envelope that spans two
//! `decode` calls arrives as separate fragments each time. This module is
//! the upstream collector a dispatcher's input assumes already reassembled
//! it — it accumulates fragments across calls and only hands the sysex
//! dispatcher a payload once `END_SYSEX` closes the envelope.

use std::collections::VecDeque;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::constants::*;
use crate::error::{FirmataError, Result};
use crate::parser::{feed, Packet, PacketName, ParserState};
use crate::sysex::{self, onewire, SysexMessage};
use crate::version::{name_to_opcode, negotiate_version, ProtocolVersion};

/// One decoded unit of input: either a short (non-SysEx) message passed
/// through with its resolved name, or a fully reassembled and dispatched
/// SysEx message.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage {
    Short {
        opcode: u8,
        name: PacketName,
        data: Vec<u8>,
    },
    Sysex(SysexMessage),
}

/// Owns one connection's parser state and negotiated protocol version.
/// Never shared across threads: hold one per connection, not one globally.
#[derive(Debug, Clone)]
pub struct CodecSession {
    parser: ParserState,
    version: ProtocolVersion,
    sysex_buffer: Option<Vec<u8>>,
    pending: VecDeque<DecodedMessage>,
}

impl Default for CodecSession {
    fn default() -> Self {
        Self {
            parser: ParserState::default(),
            version: ProtocolVersion::default(),
            sysex_buffer: None,
            pending: VecDeque::new(),
        }
    }
}

impl CodecSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Feeds `bytes` through the frame parser, reassembles any SysEx
    /// envelopes spanning this and prior calls, and dispatches each
    /// complete message. Partial state (an unclosed SysEx envelope, a
    /// short message still missing data bytes) persists for the next call.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<Vec<DecodedMessage>> {
        let packets = feed(&mut self.parser, self.version, bytes);
        let mut out = Vec::with_capacity(packets.len());

        for packet in packets {
            match packet.name {
                PacketName::StartSysex | PacketName::Known("START_SYSEX") => {
                    self.sysex_buffer = Some(Vec::new());
                }
                PacketName::DataSysex => match self.sysex_buffer.as_mut() {
                    Some(buf) => buf.extend_from_slice(&packet.data),
                    None => log::trace!("DATA_SYSEX fragment with no open envelope, dropping"),
                },
                PacketName::EndSysex | PacketName::Known("END_SYSEX") => {
                    if let Some(buf) = self.sysex_buffer.take() {
                        out.push(DecodedMessage::Sysex(sysex::dispatch(&buf, self.version)?));
                    }
                }
                _ => {
                    self.observe_protocol_version(&packet);
                    out.push(DecodedMessage::Short {
                        opcode: packet.opcode,
                        name: packet.name,
                        data: packet.data,
                    });
                }
            }
        }

        Ok(out)
    }

    /// Updates the negotiated version from an observed `REPORT_VERSION`
    /// message.
    fn observe_protocol_version(&mut self, packet: &Packet) {
        if packet.opcode == PROTOCOL_VERSION && packet.data.len() >= 2 {
            let tag = format!("V_{}_{:02}", packet.data[0], packet.data[1]);
            self.version = negotiate_version(&tag);
        }
    }

    /// Builds a short (non-SysEx) message by its symbolic name. `channel`
    /// is folded into the opcode's low nibble for the four commands whose
    /// wire byte encodes a pin or port number (`DIGITAL_MESSAGE`,
    /// `ANALOG_MESSAGE`, `REPORT_ANALOG`, `REPORT_DIGITAL`); ignored
    /// otherwise.
    ///
    /// An unrecognized `command_name` is a soft failure: this returns an
    /// empty byte sequence rather than an error.
    #[must_use]
    pub fn encode_short(&self, command_name: &str, channel: u8, data: &[u8]) -> Vec<u8> {
        let Some(opcode) = name_to_opcode(self.version, command_name) else {
            return Vec::new();
        };
        let is_ranged = matches!(
            opcode,
            DIGITAL_MESSAGE | ANALOG_MESSAGE | REPORT_ANALOG | REPORT_DIGITAL
        );
        let final_opcode = if is_ranged {
            opcode | (channel & 0x0F)
        } else {
            opcode
        };
        let mut out = vec![final_opcode];
        out.extend_from_slice(data);
        out
    }

    /// Wraps an already-built SysEx command-plus-payload in `START_SYSEX`/
    /// `END_SYSEX` framing.
    #[must_use]
    pub fn encode_sysex(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(payload.len() + 2);
        out.push(START_SYSEX);
        out.extend_from_slice(payload);
        out.push(END_SYSEX);
        out
    }

    /// Builds a framed SysEx message from a symbolic command name plus its
    /// body.
    ///
    /// An unrecognized `command_name` is a soft failure: this returns an
    /// empty byte sequence rather than an error.
    #[must_use]
    pub fn encode_sysex_command(&self, command_name: &str, payload: &[u8]) -> Vec<u8> {
        let Some(opcode) = name_to_opcode(self.version, command_name) else {
            return Vec::new();
        };
        let mut body = vec![opcode];
        body.extend_from_slice(payload);
        self.encode_sysex(&body)
    }

    /// Builds a framed 1-Wire request, honoring this session's negotiated
    /// version for the correlation-id field.
    #[must_use]
    pub fn onewire_request(&self, pin: u8, request: &onewire::OneWireRequest) -> Vec<u8> {
        self.encode_sysex(&request.encode(pin, self.version))
    }
}

/// `tokio_util::codec` adaptation: wraps this session for use with
/// `Framed`. Only the synchronous decode/encode shape is used here — this
/// crate pulls in no async runtime of its own and never suspends; a caller
/// running under tokio can wrap a connection in `Framed::new(io, session)`
/// and get `Stream`/`Sink` for free.
impl Decoder for CodecSession {
    type Item = DecodedMessage;
    type Error = FirmataError;

    fn decode(&mut self, src: &mut BytesMut) -> std::result::Result<Option<Self::Item>, Self::Error> {
        if self.pending.is_empty() {
            let bytes = src.split_to(src.len());
            let messages = self.decode(&bytes)?;
            self.pending.extend(messages);
        }
        Ok(self.pending.pop_front())
    }
}

/// Encodes a pre-built frame (the output of [`CodecSession::encode_short`],
/// [`CodecSession::encode_sysex`], or [`CodecSession::encode_sysex_command`])
/// as-is; this session never needs to inspect an outbound message's shape
/// to serialize it; the builder methods already produced final wire bytes.
impl Encoder<Vec<u8>> for CodecSession {
    type Error = FirmataError;

    fn encode(&mut self, item: Vec<u8>, dst: &mut BytesMut) -> std::result::Result<(), Self::Error> {
        dst.extend_from_slice(&item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reassembles_sysex_split_across_calls() {
        let mut session = CodecSession::new();
        let first = session.decode(&[0xF0, 0x79, 0x02]).unwrap();
        assert!(first.is_empty());
        let second = session.decode(&[0x05, 0xF7]).unwrap();
        assert_eq!(second.len(), 1);
        match &second[0] {
            DecodedMessage::Sysex(SysexMessage::ReportFirmware { major, minor, name }) => {
                assert_eq!(*major, 2);
                assert_eq!(*minor, 5);
                assert_eq!(name, "");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn decode_passes_through_short_messages() {
        let mut session = CodecSession::new();
        let packets = session.decode(&[0x90, 0x01, 0x00]).unwrap();
        assert_eq!(packets.len(), 1);
        match &packets[0] {
            DecodedMessage::Short { opcode, data, .. } => {
                assert_eq!(*opcode, 0x90);
                assert_eq!(data, &[0x01, 0x00]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn report_version_updates_negotiated_version() {
        let mut session = CodecSession::new();
        session.decode(&[PROTOCOL_VERSION, 2, 3]).unwrap();
        assert_eq!(session.version(), ProtocolVersion::V2_03);
    }

    #[test]
    fn encode_short_folds_channel_into_ranged_opcodes() {
        let bytes = CodecSession::new().encode_short("DIGITAL_MESSAGE", 3, &[0x01, 0x00]);
        assert_eq!(bytes[0], DIGITAL_MESSAGE | 3);
    }

    #[test]
    fn encode_short_is_empty_on_unknown_command() {
        assert!(CodecSession::new()
            .encode_short("NOT_A_COMMAND", 0, &[])
            .is_empty());
    }

    #[test]
    fn encode_sysex_command_wraps_opcode_and_framing() {
        let bytes = CodecSession::new().encode_sysex_command("CAPABILITY_QUERY", &[]);
        assert_eq!(bytes, vec![START_SYSEX, CAPABILITY_QUERY, END_SYSEX]);
    }

    #[test]
    fn encode_sysex_command_is_empty_on_unknown_command() {
        assert!(CodecSession::new()
            .encode_sysex_command("NOT_A_COMMAND", &[])
            .is_empty());
    }

    #[test]
    fn tokio_util_decoder_yields_one_message_per_call() {
        let mut session = CodecSession::new();
        let mut buf = BytesMut::from(&[0x90, 0x01, 0x00, 0xD0, 0x01][..]);
        let first = Decoder::decode(&mut session, &mut buf).unwrap().unwrap();
        assert!(matches!(first, DecodedMessage::Short { opcode: 0x90, .. }));
        let second = Decoder::decode(&mut session, &mut buf).unwrap().unwrap();
        assert!(matches!(second, DecodedMessage::Short { opcode: 0xD0, .. }));
        assert!(Decoder::decode(&mut session, &mut buf).unwrap().is_none());
    }

    #[test]
    fn tokio_util_encoder_writes_bytes_verbatim() {
        let mut session = CodecSession::new();
        let mut dst = BytesMut::new();
        Encoder::encode(&mut session, vec![0x90, 0x01, 0x00], &mut dst).unwrap();
        assert_eq!(&dst[..], &[0x90, 0x01, 0x00]);
    }
}
