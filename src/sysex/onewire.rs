//! 1-Wire subprotocol.
//!
//! Requests share the shape `ONEWIRE_DATA, subcmd, pin, [7-bit-packed
//! body]`, where `subcmd` is a bitmask. Replies are distinct fixed subcmd
//! values (0x42/0x43/0x45), not bitmask combinations.

use crate::constants::*;
use crate::numeric::{pack7, unpack7, OneWireAddress};
use crate::version::ProtocolVersion;

/// Which optional fields a 1-Wire request carries, combined into the
/// request's bitmask `subcmd` byte in the fixed order the wire format
/// requires: device, read count (+ correlation id), delay, write bytes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneWireRequest {
    pub reset: bool,
    pub skip: bool,
    pub select: Option<OneWireAddress>,
    pub read_count: Option<u16>,
    pub correlation_id: Option<u16>,
    pub delay_us: Option<u32>,
    pub write_bytes: Option<Vec<u8>>,
}

impl OneWireRequest {
    fn subcmd(&self) -> u8 {
        let mut bits = 0u8;
        if self.reset {
            bits |= ONEWIRE_RESET;
        }
        if self.skip {
            bits |= ONEWIRE_SKIP;
        }
        if self.select.is_some() {
            bits |= ONEWIRE_SELECT;
        }
        if self.read_count.is_some() {
            bits |= ONEWIRE_READ;
        }
        if self.delay_us.is_some() {
            bits |= ONEWIRE_DELAY;
        }
        if self.write_bytes.is_some() {
            bits |= ONEWIRE_WRITE;
        }
        bits
    }

    /// Builds the SysEx payload (subcommand byte onward, not including the
    /// `START_SYSEX`/`ONEWIRE_DATA`/`END_SYSEX` framing — callers typically
    /// reach this through [`crate::session::CodecSession::onewire_request`]).
    #[must_use]
    pub fn encode(&self, pin: u8, version: ProtocolVersion) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(addr) = self.select {
            body.extend_from_slice(&addr.pack());
        }
        if let Some(count) = self.read_count {
            body.extend_from_slice(&count.to_le_bytes());
            if version.onewire_has_correlation_id() {
                let id = self.correlation_id.unwrap_or(0);
                body.extend_from_slice(&id.to_le_bytes());
            }
        }
        if let Some(delay) = self.delay_us {
            body.extend_from_slice(&delay.to_le_bytes());
        }
        if let Some(write) = &self.write_bytes {
            body.extend_from_slice(write);
        }

        let mut out = vec![ONEWIRE_DATA, self.subcmd(), pin];
        out.extend(pack7(&body));
        out
    }
}

/// A decoded 1-Wire reply.
#[derive(Debug, Clone, PartialEq)]
pub enum OneWireReply {
    /// `READ_REPLY`. In `V_2_04` the leading 8 bytes of the unpacked body
    /// are the device address; in later versions a 2-byte correlation id
    /// precedes the data instead.
    Read {
        device: Option<OneWireAddress>,
        correlation_id: Option<u16>,
        data: Vec<u8>,
    },
    /// `SEARCH_REPLY`: every device found by a normal search.
    Search { devices: Vec<OneWireAddress> },
    /// `SEARCH_ALARMS_REPLY`: every device found with its alarm flag set.
    SearchAlarms { devices: Vec<OneWireAddress> },
    /// A subcmd this crate does not recognize as a reply; passed through.
    Other { subcmd: u8, data: Vec<u8> },
}

/// Dispatches an already-unwrapped `ONEWIRE_DATA` payload (i.e. `payload[0]
/// == ONEWIRE_DATA`, `payload[1]` is the reply subcmd).
#[must_use]
pub fn dispatch(payload: &[u8], version: ProtocolVersion) -> OneWireReply {
    let Some(&subcmd) = payload.get(1) else {
        return OneWireReply::Other {
            subcmd: 0,
            data: Vec::new(),
        };
    };
    let packed = payload.get(2..).unwrap_or(&[]);
    let body = unpack7(packed);

    match subcmd {
        ONEWIRE_READ_REPLY => {
            if version == ProtocolVersion::V2_04 {
                match OneWireAddress::unpack(&body) {
                    Some((device, rest)) => OneWireReply::Read {
                        device: Some(device),
                        correlation_id: None,
                        data: rest.to_vec(),
                    },
                    None => OneWireReply::Read {
                        device: None,
                        correlation_id: None,
                        data: body,
                    },
                }
            } else if body.len() >= 2 {
                let id = u16::from_le_bytes([body[0], body[1]]);
                OneWireReply::Read {
                    device: None,
                    correlation_id: Some(id),
                    data: body[2..].to_vec(),
                }
            } else {
                OneWireReply::Read {
                    device: None,
                    correlation_id: None,
                    data: body,
                }
            }
        }
        ONEWIRE_SEARCH_REPLY => OneWireReply::Search {
            devices: collect_addresses(&body),
        },
        ONEWIRE_SEARCH_ALARMS_REPLY => OneWireReply::SearchAlarms {
            devices: collect_addresses(&body),
        },
        other => OneWireReply::Other {
            subcmd: other,
            data: body,
        },
    }
}

fn collect_addresses(mut body: &[u8]) -> Vec<OneWireAddress> {
    let mut devices = Vec::new();
    while let Some((addr, rest)) = OneWireAddress::unpack(body) {
        devices.push(addr);
        body = rest;
    }
    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_read_request_includes_count_and_id_post_v204() {
        let req = OneWireRequest {
            read_count: Some(8),
            correlation_id: Some(42),
            ..Default::default()
        };
        let encoded = req.encode(3, ProtocolVersion::V2_05);
        assert_eq!(encoded[0], ONEWIRE_DATA);
        assert_eq!(encoded[1], ONEWIRE_READ);
        assert_eq!(encoded[2], 3);
    }

    #[test]
    fn encode_read_request_omits_id_on_v204() {
        let with_id = OneWireRequest {
            read_count: Some(8),
            correlation_id: Some(42),
            ..Default::default()
        };
        let without_id = OneWireRequest {
            read_count: Some(8),
            correlation_id: None,
            ..Default::default()
        };
        assert_eq!(
            with_id.encode(3, ProtocolVersion::V2_04),
            without_id.encode(3, ProtocolVersion::V2_04)
        );
    }

    #[test]
    fn search_reply_collects_all_devices() {
        let addr = OneWireAddress {
            family: 0x28,
            identity: [1, 2, 3, 4, 5, 6],
            crc: 0x10,
        };
        let packed_body = pack7(&[addr.pack(), addr.pack()].concat());
        let mut payload = vec![ONEWIRE_DATA, ONEWIRE_SEARCH_REPLY];
        payload.extend(packed_body);
        match dispatch(&payload, ProtocolVersion::V2_06) {
            OneWireReply::Search { devices } => assert_eq!(devices, vec![addr, addr]),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn read_reply_v204_leads_with_device_address() {
        let addr = OneWireAddress {
            family: 0x28,
            identity: [9, 8, 7, 6, 5, 4],
            crc: 0x11,
        };
        let mut raw = addr.pack().to_vec();
        raw.extend_from_slice(&[0xAA, 0xBB]);
        let packed = pack7(&raw);
        let mut payload = vec![ONEWIRE_DATA, ONEWIRE_READ_REPLY];
        payload.extend(packed);
        match dispatch(&payload, ProtocolVersion::V2_04) {
            OneWireReply::Read { device, data, .. } => {
                assert_eq!(device, Some(addr));
                assert_eq!(data, vec![0xAA, 0xBB]);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }
}
