//! Rotary encoder subprotocol.

use crate::constants::*;

/// Builds `ATTACH`: binds encoder `id` to a pair of pins.
#[must_use]
pub fn attach(id: u8, pin_a: u8, pin_b: u8) -> Vec<u8> {
    vec![ENCODER_DATA, ENCODER_ATTACH, id, pin_a, pin_b]
}

/// Builds `REPORT_POSITION`: requests a one-shot position report for `id`.
#[must_use]
pub fn report(id: u8) -> Vec<u8> {
    vec![ENCODER_DATA, ENCODER_REPORT_POSITION, id]
}

/// Builds `DETACH`: releases encoder `id`.
#[must_use]
pub fn detach(id: u8) -> Vec<u8> {
    vec![ENCODER_DATA, ENCODER_DETACH, id]
}

/// Builds `RESET`: zeroes every attached encoder's running count.
#[must_use]
pub fn reset() -> Vec<u8> {
    vec![ENCODER_DATA, ENCODER_RESET]
}

/// Builds `REPORT_AUTO`: enables or disables unsolicited periodic reports.
#[must_use]
pub fn report_auto(enabled: bool) -> Vec<u8> {
    vec![ENCODER_DATA, ENCODER_REPORT_AUTO, u8::from(enabled)]
}

/// One encoder's position, as carried by a `REPORT_POSITIONS` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderPosition {
    pub id: u8,
    pub position: i32,
}

/// Decodes a `REPORT_POSITIONS` reply body (already past `ENCODER_DATA`,
/// `ENCODER_REPORT_POSITIONS`): a run of records, each a direction/id byte
/// (`0x40` bit is the sign, low 6 bits the encoder id) followed by two
/// 14-bit values whose low/high halves compose a 28-bit magnitude.
#[must_use]
pub fn decode_positions(body: &[u8]) -> Vec<EncoderPosition> {
    let mut out = Vec::new();
    let mut chunks = body.chunks_exact(5);
    for chunk in &mut chunks {
        let id = chunk[0] & ENCODER_ID_MASK;
        let negative = chunk[0] & ENCODER_DIRECTION_BIT != 0;
        let low14 = u32::from(chunk[1]) | (u32::from(chunk[2]) << 7);
        let high14 = u32::from(chunk[3]) | (u32::from(chunk[4]) << 7);
        let magnitude = (low14 | (high14 << 14)) as i64;
        let position = if negative { -magnitude } else { magnitude } as i32;
        out.push(EncoderPosition { id, position });
    }
    out
}

/// A decoded encoder message.
#[derive(Debug, Clone, PartialEq)]
pub enum EncoderMessage {
    Positions(Vec<EncoderPosition>),
    Other { subcmd: u8, data: Vec<u8> },
}

/// Dispatches an already-unwrapped `ENCODER_DATA` payload.
#[must_use]
pub fn dispatch(payload: &[u8]) -> EncoderMessage {
    let Some(&subcmd) = payload.get(1) else {
        return EncoderMessage::Other {
            subcmd: 0,
            data: Vec::new(),
        };
    };
    let body = payload.get(2..).unwrap_or(&[]);

    match subcmd {
        ENCODER_REPORT_POSITION | ENCODER_REPORT_POSITIONS => {
            EncoderMessage::Positions(decode_positions(body))
        }
        other => EncoderMessage::Other {
            subcmd: other,
            data: body.to_vec(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_builds_expected_bytes() {
        assert_eq!(attach(1, 2, 3), vec![ENCODER_DATA, ENCODER_ATTACH, 1, 2, 3]);
    }

    #[test]
    fn decode_positions_reads_positive_value() {
        // magnitude 200 = 0b1100_1000; low14 bits 0..7 = 0x48, bits 7..14 = 0x01
        let body = [0x02, 0x48, 0x01, 0x00, 0x00];
        let positions = decode_positions(&body);
        assert_eq!(positions, vec![EncoderPosition { id: 2, position: 200 }]);
    }

    #[test]
    fn decode_positions_honors_direction_bit() {
        let body = [ENCODER_DIRECTION_BIT | 0x02, 0x48, 0x01, 0x00, 0x00];
        let positions = decode_positions(&body);
        assert_eq!(positions, vec![EncoderPosition { id: 2, position: -200 }]);
    }

    #[test]
    fn decode_positions_handles_multiple_records() {
        let body = [
            0x00, 0x01, 0x00, 0x00, 0x00, // id 0, position 1
            0x01, 0x02, 0x00, 0x00, 0x00, // id 1, position 2
        ];
        let positions = decode_positions(&body);
        assert_eq!(
            positions,
            vec![
                EncoderPosition { id: 0, position: 1 },
                EncoderPosition { id: 1, position: 2 },
            ]
        );
    }

    #[test]
    fn dispatch_routes_report_positions() {
        let mut payload = vec![ENCODER_DATA, ENCODER_REPORT_POSITIONS];
        payload.extend_from_slice(&[0x00, 0x05, 0x00, 0x00, 0x00]);
        match dispatch(&payload) {
            EncoderMessage::Positions(positions) => {
                assert_eq!(positions, vec![EncoderPosition { id: 0, position: 5 }]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
