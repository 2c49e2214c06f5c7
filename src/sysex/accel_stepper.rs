//! AccelStepper subprotocol: up to 10 devices (ids 0–9) in up to 5 groups
//! (ids 0–4).

use crate::constants::*;
use crate::error::{FirmataError, Result};
use crate::numeric::{decode32, decode_float, encode32, encode_float};

const MAX_DEVICE_ID: u8 = 9;
const MAX_GROUP_ID: u8 = 4;
const MAX_GROUP_MEMBERS: usize = 10;

fn check_device_id(id: u8) -> Result<()> {
    if id > MAX_DEVICE_ID {
        return Err(FirmataError::InvalidArgument(
            "AccelStepper device id must be in 0..=9",
        ));
    }
    Ok(())
}

fn check_group_id(id: u8) -> Result<()> {
    if id > MAX_GROUP_ID {
        return Err(FirmataError::InvalidArgument(
            "AccelStepper group id must be in 0..=4",
        ));
    }
    Ok(())
}

/// Builds `CONFIG`. `interface` and `step_mode` are each masked to 3 bits;
/// `invert` lists the *pin numbers* (not positional indices) the caller
/// wants electrically inverted — the resulting
/// mask has a bit set for each configured pin (in `pin1, pin2, pin3?,
/// pin4?, enable_pin?` order) that appears in `invert`.
///
/// # Errors
/// Returns [`FirmataError::InvalidArgument`] if `device_id > 9`.
pub fn config(
    device_id: u8,
    interface: u8,
    step_mode: u8,
    pin1: u8,
    pin2: u8,
    pin3: Option<u8>,
    pin4: Option<u8>,
    enable_pin: Option<u8>,
    invert: &[u8],
) -> Result<Vec<u8>> {
    check_device_id(device_id)?;

    let has_enable = enable_pin.is_some();
    let iface_byte = ((interface & 0x07) << 4) | ((step_mode & 0x07) << 1) | u8::from(has_enable);

    let mut pins = vec![pin1, pin2];
    pins.extend(pin3);
    pins.extend(pin4);
    pins.extend(enable_pin);

    let mut invert_mask = 0u8;
    for (i, pin) in pins.iter().enumerate() {
        if invert.contains(pin) {
            invert_mask |= 1 << i;
        }
    }

    let mut out = vec![ACCELSTEPPER_DATA, ACCELSTEPPER_CONFIG, device_id, iface_byte];
    out.extend_from_slice(&pins);
    out.push(invert_mask);
    Ok(out)
}

fn motion_command(opcode: u8, device_id: u8, position: i32) -> Result<Vec<u8>> {
    check_device_id(device_id)?;
    let mut out = vec![ACCELSTEPPER_DATA, opcode, device_id];
    out.extend_from_slice(&encode32(position));
    Ok(out)
}

/// Steps by a relative signed count (32-bit encoded).
pub fn step(device_id: u8, steps: i32) -> Result<Vec<u8>> {
    motion_command(ACCELSTEPPER_STEP, device_id, steps)
}

/// Moves to an absolute position (32-bit encoded).
pub fn to(device_id: u8, position: i32) -> Result<Vec<u8>> {
    motion_command(ACCELSTEPPER_TO, device_id, position)
}

/// Resets the device's notion of "current position" to the given value.
pub fn zero(device_id: u8, position: i32) -> Result<Vec<u8>> {
    motion_command(ACCELSTEPPER_ZERO, device_id, position)
}

/// Relative move by a signed step count (32-bit encoded) — distinct from
/// [`step`] only in the opcode the firmware dispatches on.
pub fn move_relative(device_id: u8, steps: i32) -> Result<Vec<u8>> {
    motion_command(ACCELSTEPPER_STEP, device_id, steps)
}

/// Builds `SPEED`: sets a device's target speed (custom float encoded).
pub fn speed(device_id: u8, speed: f64) -> Result<Vec<u8>> {
    check_device_id(device_id)?;
    let mut out = vec![ACCELSTEPPER_DATA, ACCELSTEPPER_SPEED, device_id];
    out.extend_from_slice(&encode_float(speed));
    Ok(out)
}

/// Builds `ACCEL`: sets a device's acceleration (custom float encoded).
pub fn accel(device_id: u8, accel: f64) -> Result<Vec<u8>> {
    check_device_id(device_id)?;
    let mut out = vec![ACCELSTEPPER_DATA, ACCELSTEPPER_ACCEL, device_id];
    out.extend_from_slice(&encode_float(accel));
    Ok(out)
}

/// Builds `ENABLE`.
pub fn enable(device_id: u8, enabled: bool) -> Result<Vec<u8>> {
    check_device_id(device_id)?;
    Ok(vec![
        ACCELSTEPPER_DATA,
        ACCELSTEPPER_ENABLE,
        device_id,
        u8::from(enabled),
    ])
}

/// Builds `STOP`: halts a single device immediately.
pub fn stop(device_id: u8) -> Result<Vec<u8>> {
    check_device_id(device_id)?;
    Ok(vec![ACCELSTEPPER_DATA, ACCELSTEPPER_STOP, device_id])
}

/// Builds `MULTICONFIG`: assigns up to 10 device ids to group `group`.
///
/// # Errors
/// Returns [`FirmataError::InvalidArgument`] if `group > 4` or `members`
/// has more than 10 entries.
pub fn multi_config(group: u8, members: &[u8]) -> Result<Vec<u8>> {
    check_group_id(group)?;
    if members.len() > MAX_GROUP_MEMBERS {
        return Err(FirmataError::InvalidArgument(
            "AccelStepper group cannot have more than 10 members",
        ));
    }
    let mut out = vec![ACCELSTEPPER_DATA, ACCELSTEPPER_MULTICONFIG, group];
    out.extend_from_slice(members);
    Ok(out)
}

/// Builds `MULTITO`: moves every device in `group` to an absolute position.
pub fn multi_to(group: u8, position: i32) -> Result<Vec<u8>> {
    check_group_id(group)?;
    let mut out = vec![ACCELSTEPPER_DATA, ACCELSTEPPER_MULTITO, group];
    out.extend_from_slice(&encode32(position));
    Ok(out)
}

/// Builds `MULTISTOP`: halts every device in `group`.
pub fn multi_stop(group: u8) -> Result<Vec<u8>> {
    check_group_id(group)?;
    Ok(vec![ACCELSTEPPER_DATA, ACCELSTEPPER_MULTISTOP, group])
}

/// Builds `MULTIMOVE`: relative move for every device in `group`.
pub fn multi_move(group: u8, steps: i32) -> Result<Vec<u8>> {
    check_group_id(group)?;
    let mut out = vec![ACCELSTEPPER_DATA, ACCELSTEPPER_MULTIMOVE, group];
    out.extend_from_slice(&encode32(steps));
    Ok(out)
}

/// A decoded AccelStepper reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelStepperReply {
    MoveComplete { device_id: u8, position: i32 },
    ReportPosition { device_id: u8, position: i32 },
    MultiMoveComplete { group: u8 },
}

/// A decoded AccelStepper message: a recognized reply, or an
/// unrecognized/malformed subcmd passed through for the caller to inspect.
#[derive(Debug, Clone, PartialEq)]
pub enum AccelStepperMessage {
    Reply(AccelStepperReply),
    Other { subcmd: u8, data: Vec<u8> },
}

/// Dispatches an already-unwrapped `ACCELSTEPPER_DATA` payload.
#[must_use]
pub fn dispatch(payload: &[u8]) -> AccelStepperMessage {
    let Some(&subcmd) = payload.get(1) else {
        return AccelStepperMessage::Other {
            subcmd: 0,
            data: Vec::new(),
        };
    };
    let body = payload.get(2..).unwrap_or(&[]);

    match subcmd {
        ACCELSTEPPER_MOVE_COMPLETE | ACCELSTEPPER_REPORT_POSITION if body.len() >= 6 => {
            let device_id = body[0];
            let mut encoded = [0u8; 5];
            encoded.copy_from_slice(&body[1..6]);
            let position = decode32(&encoded);
            let reply = if subcmd == ACCELSTEPPER_MOVE_COMPLETE {
                AccelStepperReply::MoveComplete { device_id, position }
            } else {
                AccelStepperReply::ReportPosition { device_id, position }
            };
            AccelStepperMessage::Reply(reply)
        }
        ACCELSTEPPER_MULTIMOVE_COMPLETE if !body.is_empty() => {
            AccelStepperMessage::Reply(AccelStepperReply::MultiMoveComplete { group: body[0] })
        }
        other => AccelStepperMessage::Other {
            subcmd: other,
            data: body.to_vec(),
        },
    }
}

/// Decodes a speed/acceleration custom float payload (convenience wrapper
/// around [`decode_float`] for callers reading back an echoed SPEED/ACCEL).
#[must_use]
pub fn decode_speed(bytes: &[u8; 4]) -> f64 {
    decode_float(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_bad_device_id() {
        assert!(config(10, 1, 0, 2, 3, None, None, None, &[]).is_err());
    }

    #[test]
    fn config_iface_byte_packs_interface_step_and_enable_flag() {
        let bytes = config(0, 3, 2, 10, 11, None, None, Some(12), &[]).unwrap();
        let iface = bytes[3];
        assert_eq!(iface, ((3 & 0x07) << 4) | ((2 & 0x07) << 1) | 1);
    }

    #[test]
    fn config_invert_mask_matches_configured_pins() {
        let bytes = config(0, 1, 0, 10, 11, Some(12), None, None, &[11, 12]).unwrap();
        // pins are [10, 11, 12]; invert list selects indices 1 and 2.
        let invert_mask = *bytes.last().unwrap();
        assert_eq!(invert_mask, 0b0000_0110);
    }

    #[test]
    fn multi_config_rejects_oversized_group() {
        let members: Vec<u8> = (0..11).collect();
        assert!(multi_config(0, &members).is_err());
        assert!(multi_config(5, &[0]).is_err());
    }

    #[test]
    fn dispatch_decodes_move_complete() {
        let mut payload = vec![ACCELSTEPPER_DATA, ACCELSTEPPER_MOVE_COMPLETE, 3];
        payload.extend_from_slice(&encode32(-500));
        match dispatch(&payload) {
            AccelStepperMessage::Reply(AccelStepperReply::MoveComplete { device_id, position }) => {
                assert_eq!(device_id, 3);
                assert_eq!(position, -500);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn dispatch_decodes_multimove_complete() {
        let payload = vec![ACCELSTEPPER_DATA, ACCELSTEPPER_MULTIMOVE_COMPLETE, 2];
        assert_eq!(
            dispatch(&payload),
            AccelStepperMessage::Reply(AccelStepperReply::MultiMoveComplete { group: 2 })
        );
    }
}
