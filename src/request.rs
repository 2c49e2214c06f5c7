//! Request builders: the encode side of every operation that isn't already
//! owned by a feature submodule under [`crate::sysex`]. Pure functions
//! returning the bytes to send, with no transport dependency.

use crate::constants::*;
use crate::numeric::{double7_encode, pack14, pack7};
use crate::pin::PinMode;

/// Builds `REPORT_DIGITAL`: enables or disables unsolicited digital port
/// reporting.
#[must_use]
pub fn report_digital(port: u8, enabled: bool) -> Vec<u8> {
    vec![REPORT_DIGITAL | port, u8::from(enabled)]
}

/// Builds `REPORT_ANALOG`: enables or disables unsolicited analog pin
/// reporting.
#[must_use]
pub fn report_analog(pin: u8, enabled: bool) -> Vec<u8> {
    vec![REPORT_ANALOG | pin, u8::from(enabled)]
}

/// Builds `ANALOG_MESSAGE`, or `EXTENDED_ANALOG` when `pin` or `value`
/// don't fit the short form's 4-bit pin / 14-bit value.
#[must_use]
pub fn analog_write(pin: u8, value: u16) -> Vec<u8> {
    if pin < 16 && value < (1 << 14) {
        let b = pack14(value);
        vec![ANALOG_MESSAGE | pin, b[0], b[1]]
    } else {
        extended_analog(pin, u32::from(value))
    }
}

/// Builds `EXTENDED_ANALOG` directly, for pins or values the short
/// `ANALOG_MESSAGE` form cannot address.
#[must_use]
pub fn extended_analog(pin: u8, value: u32) -> Vec<u8> {
    let mut out = vec![START_SYSEX, EXTENDED_ANALOG, pin];
    out.extend(pack7(&value.to_le_bytes()));
    out.push(END_SYSEX);
    out
}

/// Builds `DIGITAL_MESSAGE`: sets an entire 8-pin port's output bitmask.
#[must_use]
pub fn digital_write(port: u8, bitmask: u16) -> Vec<u8> {
    let b = pack14(bitmask);
    vec![DIGITAL_MESSAGE | port, b[0], b[1]]
}

/// Builds `PIN_MODE`.
#[must_use]
pub fn pin_mode(pin: u8, mode: PinMode) -> Vec<u8> {
    vec![PIN_MODE, pin, mode.to_u8()]
}

/// Builds `SAMPLING_INTERVAL`.
#[must_use]
pub fn sampling_interval(ms: u16) -> Vec<u8> {
    let b = pack14(ms);
    vec![START_SYSEX, SAMPLING_INTERVAL, b[0], b[1], END_SYSEX]
}

/// Builds `STRING_DATA`.
#[must_use]
pub fn string_write(s: &str) -> Vec<u8> {
    let mut out = vec![START_SYSEX, STRING_DATA];
    out.extend(double7_encode(s.as_bytes()));
    out.push(END_SYSEX);
    out
}

/// Builds a bare `REPORT_FIRMWARE` query.
#[must_use]
pub fn report_firmware_query() -> Vec<u8> {
    vec![START_SYSEX, REPORT_FIRMWARE, END_SYSEX]
}

/// Builds a bare `CAPABILITY_QUERY`.
#[must_use]
pub fn capability_query() -> Vec<u8> {
    vec![START_SYSEX, CAPABILITY_QUERY, END_SYSEX]
}

/// Builds a bare `ANALOG_MAPPING_QUERY`.
#[must_use]
pub fn analog_mapping_query() -> Vec<u8> {
    vec![START_SYSEX, ANALOG_MAPPING_QUERY, END_SYSEX]
}

/// Builds `PIN_STATE_QUERY` for a single pin.
#[must_use]
pub fn pin_state_query(pin: u8) -> Vec<u8> {
    vec![START_SYSEX, PIN_STATE_QUERY, pin, END_SYSEX]
}

/// Builds `SERVO_CONFIG`.
#[must_use]
pub fn servo_config(pin: u8, min_pulse: u16, max_pulse: u16) -> Vec<u8> {
    let min = pack14(min_pulse);
    let max = pack14(max_pulse);
    vec![
        START_SYSEX,
        SERVO_CONFIG,
        pin,
        min[0],
        min[1],
        max[0],
        max[1],
        END_SYSEX,
    ]
}

/// Builds `I2C_CONFIG`.
#[must_use]
pub fn i2c_config(delay_us: u16) -> Vec<u8> {
    let b = pack14(delay_us);
    vec![START_SYSEX, I2C_CONFIG, b[0], b[1], END_SYSEX]
}

/// Builds an `I2C_REQUEST` write.
#[must_use]
pub fn i2c_write(address: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![START_SYSEX, I2C_REQUEST, address, I2C_MODE_WRITE << 3];
    out.extend(double7_encode(data));
    out.push(END_SYSEX);
    out
}

/// Builds an `I2C_REQUEST` one-shot read.
#[must_use]
pub fn i2c_read(address: u8, size: u16) -> Vec<u8> {
    let b = pack14(size);
    vec![
        START_SYSEX,
        I2C_REQUEST,
        address,
        I2C_MODE_READ << 3,
        b[0],
        b[1],
        END_SYSEX,
    ]
}

/// Builds an `I2C_REQUEST` continuous read.
#[must_use]
pub fn i2c_read_continuous(address: u8, size: u16) -> Vec<u8> {
    let b = pack14(size);
    vec![
        START_SYSEX,
        I2C_REQUEST,
        address,
        I2C_MODE_CONTINUOUS_READ << 3,
        b[0],
        b[1],
        END_SYSEX,
    ]
}

/// Builds an `I2C_REQUEST` stop-reading command.
#[must_use]
pub fn i2c_stop_reading(address: u8) -> Vec<u8> {
    vec![
        START_SYSEX,
        I2C_REQUEST,
        address,
        I2C_MODE_STOP_READING << 3,
        END_SYSEX,
    ]
}
