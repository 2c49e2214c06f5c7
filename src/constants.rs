//! Wire-level byte constants for the Firmata protocol.
//!
//! See <https://github.com/firmata/protocol> for the upstream reference.
//! Covers every command this crate's feature subsystems dispatch on, not
//! just the baseline digital/analog/I2C set.

// --- Header / framing bytes ---
pub const START_SYSEX: u8 = 0xF0;
pub const END_SYSEX: u8 = 0xF7;
pub const PROTOCOL_VERSION: u8 = 0xF9;
pub const SYSTEM_RESET: u8 = 0xFF;

// Analog/digital messages use a nibble to encode the pin/port, so the byte
// actually observed on the wire ranges across the whole row.
pub const ANALOG_MESSAGE: u8 = 0xE0;
pub const ANALOG_MESSAGE_END: u8 = 0xEF;
pub const DIGITAL_MESSAGE: u8 = 0x90;
pub const REPORT_ANALOG: u8 = 0xC0;
pub const REPORT_DIGITAL: u8 = 0xD0;
pub const REPORT_DIGITAL_END: u8 = 0xDF;

pub const PIN_MODE: u8 = 0xF4;
pub const DIGITAL_PIN_WRITE: u8 = 0xF5;

// --- SysEx sub-commands ---
pub const SERIAL_DATA: u8 = 0x60;
pub const ENCODER_DATA: u8 = 0x61;
pub const ACCELSTEPPER_DATA: u8 = 0x62;
pub const ANALOG_MAPPING_QUERY: u8 = 0x69;
pub const ANALOG_MAPPING_RESPONSE: u8 = 0x6A;
pub const CAPABILITY_QUERY: u8 = 0x6B;
pub const CAPABILITY_RESPONSE: u8 = 0x6C;
pub const PIN_STATE_QUERY: u8 = 0x6D;
pub const PIN_STATE_RESPONSE: u8 = 0x6E;
pub const EXTENDED_ANALOG: u8 = 0x6F;
pub const SERVO_CONFIG: u8 = 0x70;
pub const STRING_DATA: u8 = 0x71;
pub const STEPPER_DATA: u8 = 0x72;
pub const ONEWIRE_DATA: u8 = 0x73;
pub const SHIFT_DATA: u8 = 0x75;
pub const I2C_REQUEST: u8 = 0x76;
pub const I2C_REPLY: u8 = 0x77;
pub const I2C_CONFIG: u8 = 0x78;
pub const REPORT_FIRMWARE: u8 = 0x79;
pub const SAMPLING_INTERVAL: u8 = 0x7A;
pub const SCHEDULER_DATA: u8 = 0x7B;
pub const RESERVED_COMMAND: u8 = 0x7D;
pub const SYSEX_NON_REALTIME: u8 = 0x7E;
pub const SYSEX_REALTIME: u8 = 0x7F;

pub const I2C_MODE_WRITE: u8 = 0x00;
pub const I2C_MODE_READ: u8 = 0x01;
pub const I2C_MODE_CONTINUOUS_READ: u8 = 0x02;
pub const I2C_MODE_STOP_READING: u8 = 0x03;

// --- 1-Wire request bitmask (subcmd byte of ONEWIRE_DATA requests) ---
pub const ONEWIRE_RESET: u8 = 0x01;
pub const ONEWIRE_SKIP: u8 = 0x02;
pub const ONEWIRE_SELECT: u8 = 0x04;
pub const ONEWIRE_READ: u8 = 0x08;
pub const ONEWIRE_DELAY: u8 = 0x10;
pub const ONEWIRE_WRITE: u8 = 0x20;

// --- 1-Wire reply subcmd values (distinct from the request bitmask domain) ---
pub const ONEWIRE_SEARCH_REPLY: u8 = 0x42;
pub const ONEWIRE_READ_REPLY: u8 = 0x43;
pub const ONEWIRE_SEARCH_ALARMS_REPLY: u8 = 0x45;

// --- Scheduler ---
pub const SCHEDULER_CREATE: u8 = 0x00;
pub const SCHEDULER_DELETE: u8 = 0x01;
pub const SCHEDULER_ADD_TO: u8 = 0x02;
pub const SCHEDULER_DELAY: u8 = 0x03;
pub const SCHEDULER_SCHEDULE: u8 = 0x04;
pub const SCHEDULER_QUERY_ALL: u8 = 0x05;
pub const SCHEDULER_QUERY_ONE: u8 = 0x06;
pub const SCHEDULER_RESET: u8 = 0x07;
pub const SCHEDULER_ERROR: u8 = 0x08;
pub const SCHEDULER_QUERY_ALL_REPLY: u8 = 0x09;
pub const SCHEDULER_QUERY_ONE_REPLY: u8 = 0x0A;

// --- Legacy stepper ---
pub const STEPPER_CONFIG: u8 = 0x00;
pub const STEPPER_STEP: u8 = 0x01;
pub const STEPPER_INTERFACE_DRIVER: u8 = 1;
pub const STEPPER_INTERFACE_TWO_WIRE: u8 = 2;
pub const STEPPER_INTERFACE_FOUR_WIRE: u8 = 4;

// --- AccelStepper ---
pub const ACCELSTEPPER_CONFIG: u8 = 0x00;
pub const ACCELSTEPPER_STEP: u8 = 0x01;
pub const ACCELSTEPPER_TO: u8 = 0x02;
pub const ACCELSTEPPER_ENABLE: u8 = 0x04;
pub const ACCELSTEPPER_STOP: u8 = 0x05;
pub const ACCELSTEPPER_REPORT_POSITION: u8 = 0x06;
pub const ACCELSTEPPER_MOVE_COMPLETE: u8 = 0x0A;
pub const ACCELSTEPPER_SPEED: u8 = 0x09;
pub const ACCELSTEPPER_ACCEL: u8 = 0x08;
pub const ACCELSTEPPER_ZERO: u8 = 0x0B;
pub const ACCELSTEPPER_MULTICONFIG: u8 = 0x20;
pub const ACCELSTEPPER_MULTISTOP: u8 = 0x23;
pub const ACCELSTEPPER_MULTITO: u8 = 0x21;
pub const ACCELSTEPPER_MULTIMOVE: u8 = 0x22;
pub const ACCELSTEPPER_MULTIMOVE_COMPLETE: u8 = 0x24;

// --- Encoder ---
pub const ENCODER_ATTACH: u8 = 0x00;
pub const ENCODER_REPORT_POSITION: u8 = 0x01;
pub const ENCODER_REPORT_POSITIONS: u8 = 0x02;
pub const ENCODER_RESET: u8 = 0x03;
pub const ENCODER_REPORT_AUTO: u8 = 0x04;
pub const ENCODER_DETACH: u8 = 0x05;
pub const ENCODER_DIRECTION_BIT: u8 = 0x40;
pub const ENCODER_ID_MASK: u8 = 0x3F;

// --- Serial passthrough ---
pub const SERIAL_CONFIG: u8 = 0x10;
pub const SERIAL_WRITE: u8 = 0x20;
pub const SERIAL_READ: u8 = 0x30;
pub const SERIAL_REPLY: u8 = 0x40;
pub const SERIAL_CLOSE: u8 = 0x50;
pub const SERIAL_FLUSH: u8 = 0x60;
pub const SERIAL_LISTEN: u8 = 0x70;
pub const SERIAL_PORT_MASK: u8 = 0x0F;
pub const SERIAL_READ_CONTINUOUS: u8 = 0x00;
pub const SERIAL_READ_STOP: u8 = 0x01;

/// Firmata packs info into the nibbles of certain status bytes (analog/
/// digital message, report-analog/digital). Checks whether `byte` falls
/// inside the inclusive range `start..=end`.
pub fn in_range(byte: u8, start: u8, end: u8) -> bool {
    (start..=end).contains(&byte)
}
