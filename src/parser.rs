//! The frame parser: a two-state machine that segments an inbound byte
//! stream into packets.
//!
//! This is a pure, non-blocking drain over a buffer: bytes are appended,
//! then as many complete packets as possible are pulled out. A partial
//! packet simply stays buffered until more bytes arrive — there is no
//! timeout and no blocking.

use std::collections::VecDeque;

use crate::constants::*;
use crate::version::{opcode_to_name, ProtocolVersion};

/// `NORMAL` / `INSIDE_SYSEX` are not nested states — SysEx is a toggle, not
/// a sub-parser, so an interrupting realtime status byte dispatches without
/// resetting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    InsideSysex,
}

/// Owns the not-yet-consumed byte buffer and the current parser mode. Lives
/// inside a [`crate::session::CodecSession`]; never shared across threads.
#[derive(Debug, Clone)]
pub struct ParserState {
    mode: Mode,
    buffer: VecDeque<u8>,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            buffer: VecDeque::new(),
        }
    }
}

/// A symbolic name for a decoded packet: either a name resolved against the
/// session's protocol version table, or one of the four special framing
/// cases (`UNKNOWN`, `START_SYSEX`, `END_SYSEX`, `DATA_SYSEX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketName {
    Known(&'static str),
    Unknown,
    StartSysex,
    EndSysex,
    DataSysex,
}

/// One decoded packet: the raw opcode byte, its symbolic name, and whatever
/// data bytes belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub opcode: u8,
    pub name: PacketName,
    pub data: Vec<u8>,
}

/// Full-byte and high-nibble status length table. Returns the number of
/// data bytes following the status byte, if known.
fn status_length(byte: u8) -> Option<usize> {
    match byte {
        0xF4 | 0xF9 => Some(2),
        // 0x71 lacks the top bit every other entry here has; the dispatch
        // in `drain` only consults this table after confirming `b & 0x80`,
        // so this arm is unreachable in practice and kept only for
        // completeness against the documented length table.
        0x71 | 0xFF => Some(0),
        _ => {
            let row = byte & 0xF0;
            if (0x80..=0xBF).contains(&row) {
                Some(2)
            } else if in_range(row, REPORT_ANALOG, REPORT_DIGITAL_END) {
                Some(1)
            } else if in_range(row, ANALOG_MESSAGE, ANALOG_MESSAGE_END) {
                Some(2)
            } else {
                None
            }
        }
    }
}

fn resolve_name(version: ProtocolVersion, opcode: u8) -> PacketName {
    if let Some(name) = opcode_to_name(version, opcode) {
        return PacketName::Known(name);
    }
    if let Some(name) = opcode_to_name(version, opcode & 0xF0) {
        return PacketName::Known(name);
    }
    PacketName::Unknown
}

/// Appends `bytes` to the parser's buffer and drains every complete packet
/// now available, in arrival order. Partial packet state persists in
/// `state` for the next call.
pub fn feed(state: &mut ParserState, version: ProtocolVersion, bytes: &[u8]) -> Vec<Packet> {
    state.buffer.extend(bytes.iter().copied());
    drain(state, version)
}

fn drain(state: &mut ParserState, version: ProtocolVersion) -> Vec<Packet> {
    let mut packets = Vec::new();

    loop {
        let Some(&b) = state.buffer.front() else {
            break;
        };

        if state.mode == Mode::Normal && b == START_SYSEX {
            state.buffer.pop_front();
            packets.push(Packet {
                opcode: b,
                name: match opcode_to_name(version, b) {
                    Some(name) => PacketName::Known(name),
                    None => PacketName::StartSysex,
                },
                data: Vec::new(),
            });
            state.mode = Mode::InsideSysex;
            continue;
        }

        if state.mode == Mode::InsideSysex && b == END_SYSEX {
            state.buffer.pop_front();
            packets.push(Packet {
                opcode: b,
                name: match opcode_to_name(version, b) {
                    Some(name) => PacketName::Known(name),
                    None => PacketName::EndSysex,
                },
                data: Vec::new(),
            });
            state.mode = Mode::Normal;
            continue;
        }

        if b & 0x80 != 0 {
            // A status byte other than START_SYSEX/END_SYSEX dispatches
            // immediately regardless of mode — realtime status bytes
            // interrupt an open SysEx envelope without resetting it.
            let Some(len) = status_length(b) else {
                // Unknown-length status byte: treat as a bare, zero-payload
                // packet rather than stalling the stream forever.
                state.buffer.pop_front();
                packets.push(Packet {
                    opcode: b,
                    name: resolve_name(version, b),
                    data: Vec::new(),
                });
                continue;
            };
            if state.buffer.len() < 1 + len {
                log::trace!("status byte {b:#04x} wants {len} more bytes, waiting");
                break;
            }
            state.buffer.pop_front();
            let data: Vec<u8> = (0..len).map(|_| state.buffer.pop_front().unwrap()).collect();
            packets.push(Packet {
                opcode: b,
                name: resolve_name(version, b),
                data,
            });
            continue;
        }

        // Data byte (high bit clear).
        if state.mode == Mode::InsideSysex {
            state.buffer.pop_front();
            match packets.last_mut() {
                Some(Packet {
                    name: PacketName::DataSysex,
                    data,
                    ..
                }) => data.push(b),
                _ => packets.push(Packet {
                    opcode: 0,
                    name: PacketName::DataSysex,
                    data: vec![b],
                }),
            }
            continue;
        }

        // NORMAL mode, stray data byte: resynchronization junk, dropped.
        log::trace!("dropping junk data byte {b:#04x} in NORMAL mode");
        state.buffer.pop_front();
    }

    packets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(state: &mut ParserState, chunks: &[&[u8]]) -> Vec<Packet> {
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend(feed(state, ProtocolVersion::LATEST, chunk));
        }
        out
    }

    #[test]
    fn s1_report_firmware_envelope() {
        let mut state = ParserState::default();
        let packets = feed(
            &mut state,
            ProtocolVersion::LATEST,
            &[0xF0, 0x79, 0x02, 0x05, b'A', 0x00, b'B', 0x00, 0xF7],
        );
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].name, PacketName::Known("REPORT_FIRMWARE"));
        assert_eq!(packets[1].name, PacketName::DataSysex);
        assert_eq!(
            packets[1].data,
            vec![0x79, 0x02, 0x05, b'A', 0x00, b'B', 0x00]
        );
        assert_eq!(packets[2].name, PacketName::EndSysex);
    }

    #[test]
    fn s2_digital_message() {
        let mut state = ParserState::default();
        let packets = feed(&mut state, ProtocolVersion::LATEST, &[0x90, 0x3C, 0x7F]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].opcode, 0x90);
        assert_eq!(packets[0].data, vec![0x3C, 0x7F]);
    }

    #[test]
    fn s3_incomplete_then_complete() {
        let mut state = ParserState::default();
        let first = feed(&mut state, ProtocolVersion::LATEST, &[0xE0, 0x00]);
        assert!(first.is_empty());
        let second = feed(&mut state, ProtocolVersion::LATEST, &[0x40]);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].opcode, 0xE0);
        assert_eq!(second[0].data, vec![0x00, 0x40]);
    }

    #[test]
    fn normal_mode_drops_junk_bytes() {
        let mut state = ParserState::default();
        let packets = feed(&mut state, ProtocolVersion::LATEST, &[0x10, 0x20, 0x90, 0x01, 0x02]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].opcode, 0x90);
    }

    #[test]
    fn interrupt_in_sysex_does_not_reset_toggle() {
        let mut state = ParserState::default();
        // Start a sysex, one data byte, an interrupting digital message,
        // then another data byte before closing the sysex.
        let packets = feed(
            &mut state,
            ProtocolVersion::LATEST,
            &[0xF0, 0x01, 0x90, 0x00, 0x00, 0x02, 0xF7],
        );
        assert_eq!(packets[0].name, PacketName::Known("START_SYSEX"));
        assert_eq!(packets[1].name, PacketName::DataSysex);
        assert_eq!(packets[1].data, vec![0x01]);
        assert_eq!(packets[2].opcode, 0x90);
        assert_eq!(packets[3].name, PacketName::DataSysex);
        assert_eq!(packets[3].data, vec![0x02]);
        assert_eq!(packets[4].name, PacketName::EndSysex);
    }

    #[test]
    fn chunking_invariance_for_short_messages() {
        let whole = [0x90, 0x01, 0x02, 0xE2, 0x03, 0x04];
        let mut one_shot_state = ParserState::default();
        let one_shot = feed(&mut one_shot_state, ProtocolVersion::LATEST, &whole);

        let mut chunked_state = ParserState::default();
        let chunked = feed_all(
            &mut chunked_state,
            &[&whole[0..1], &whole[1..2], &whole[2..4], &whole[4..]],
        );

        assert_eq!(one_shot, chunked);
    }

    #[test]
    fn unknown_opcode_is_emitted_not_rejected() {
        let mut state = ParserState::default();
        let packets = feed(&mut state, ProtocolVersion::LATEST, &[0xF4, 0x01, 0x02]);
        assert_eq!(packets[0].name, PacketName::Known("PIN_MODE"));
    }
}
