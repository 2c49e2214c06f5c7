//! Legacy stepper subprotocol.
//!
//! No reply shape is documented for this legacy command family
//! (AccelStepper replaced it before replies were added), so this module is
//! request-only; `dispatch` in [`crate::sysex`] passes any `STEPPER_DATA`
//! payload through unparsed.

use crate::constants::*;
use crate::error::{FirmataError, Result};
use crate::numeric::pack14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperInterface {
    Driver,
    TwoWire,
    FourWire,
}

impl StepperInterface {
    const fn to_u8(self) -> u8 {
        match self {
            StepperInterface::Driver => STEPPER_INTERFACE_DRIVER,
            StepperInterface::TwoWire => STEPPER_INTERFACE_TWO_WIRE,
            StepperInterface::FourWire => STEPPER_INTERFACE_FOUR_WIRE,
        }
    }
}

/// Builds `CONFIG`: declares a stepper device's interface wiring.
///
/// # Errors
/// Returns [`FirmataError::InvalidArgument`] if `pins` doesn't match the
/// pin count the interface requires (2 for DRIVER/TWO_WIRE, 4 for
/// FOUR_WIRE).
pub fn config(device_id: u8, interface: StepperInterface, pins: &[u8]) -> Result<Vec<u8>> {
    let expected = match interface {
        StepperInterface::Driver | StepperInterface::TwoWire => 2,
        StepperInterface::FourWire => 4,
    };
    if pins.len() != expected {
        return Err(FirmataError::InvalidArgument(
            "stepper CONFIG pin count does not match interface",
        ));
    }
    let mut out = vec![STEPPER_DATA, STEPPER_CONFIG, device_id, interface.to_u8()];
    out.extend_from_slice(pins);
    Ok(out)
}

/// Builds `STEP`: move `steps` (signed, magnitude `< 2^21`) at `speed`
/// (14-bit), with an optional symmetric acceleration/deceleration pair.
///
/// # Errors
/// Returns [`FirmataError::InvalidArgument`] if `steps`'s magnitude doesn't
/// fit in 21 bits or `speed` doesn't fit in 14 bits.
pub fn step(
    device_id: u8,
    steps: i32,
    speed: u16,
    accel_decel: Option<(u16, u16)>,
) -> Result<Vec<u8>> {
    if steps.unsigned_abs() >= (1 << 21) {
        return Err(FirmataError::InvalidArgument(
            "stepper STEP count exceeds 21 bits",
        ));
    }
    if speed >= (1 << 14) {
        return Err(FirmataError::InvalidArgument(
            "stepper STEP speed exceeds 14 bits",
        ));
    }
    let direction: u8 = u8::from(steps < 0);
    let magnitude = steps.unsigned_abs();

    let mut out = vec![STEPPER_DATA, STEPPER_STEP, device_id, direction];
    out.push((magnitude & 0x7F) as u8);
    out.push(((magnitude >> 7) & 0x7F) as u8);
    out.push(((magnitude >> 14) & 0x7F) as u8);
    out.extend_from_slice(&pack14(speed));
    if let Some((accel, decel)) = accel_decel {
        out.extend_from_slice(&pack14(accel));
        out.extend_from_slice(&pack14(decel));
    }
    Ok(out)
}
