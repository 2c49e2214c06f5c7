//! SysEx dispatch: routes an already-reassembled SysEx payload (first byte
//! is the command opcode; framing bytes and fragmentation are handled
//! upstream by [`crate::session`]) to the interpreter its first byte names.
//!
//! I2C replies are keyed on `I2C_REPLY` (0x77, the actual reply opcode),
//! not `I2C_MODE_READ` (0x01, an I2C *request* mode constant that is easy
//! to confuse it with).

pub mod accel_stepper;
pub mod encoder;
pub mod onewire;
pub mod scheduler;
pub mod serial;
pub mod stepper;

use crate::constants::*;
use crate::error::Result;
use crate::numeric::{double7_decode, unpack14};
use crate::pin::{PinCapability, PinMode};
use crate::version::ProtocolVersion;

/// A decoded SysEx message. Variants that carry their own interpreter
/// (`OneWire`, `Scheduler`, `AccelStepper`, `Encoder`, `Serial`) wrap that
/// submodule's own message type rather than duplicating its shape here.
#[derive(Debug, Clone, PartialEq)]
pub enum SysexMessage {
    StringData(String),
    ReportFirmware {
        major: u8,
        minor: u8,
        name: String,
    },
    Capability(Vec<PinCapability>),
    /// One entry per pin; `None` marks a pin with no analog channel.
    AnalogMapping(Vec<Option<u8>>),
    PinState {
        pin: u8,
        mode: Option<PinMode>,
        state: u32,
    },
    I2cReply {
        address: u16,
        register: u16,
        data: Vec<u16>,
    },
    OneWire(onewire::OneWireReply),
    Scheduler(scheduler::SchedulerReply),
    /// The legacy Stepper subprotocol has no documented reply shape;
    /// payloads pass through unparsed.
    Stepper(Vec<u8>),
    AccelStepper(accel_stepper::AccelStepperMessage),
    Encoder(encoder::EncoderMessage),
    Serial(serial::SerialMessage),
    Reserved(Vec<u8>),
    /// A SysEx opcode this crate does not interpret.
    Other { opcode: u8, data: Vec<u8> },
}

/// Dispatches a full SysEx payload — `payload[0]` is the command opcode,
/// the rest its body.
pub fn dispatch(payload: &[u8], version: ProtocolVersion) -> Result<SysexMessage> {
    let Some(&opcode) = payload.first() else {
        return Ok(SysexMessage::Other {
            opcode: 0,
            data: Vec::new(),
        });
    };
    let body = payload.get(1..).unwrap_or(&[]);

    match opcode {
        STRING_DATA => Ok(SysexMessage::StringData(decode_string(body)?)),
        REPORT_FIRMWARE => Ok(decode_report_firmware(body)),
        CAPABILITY_RESPONSE => Ok(SysexMessage::Capability(decode_capability(body))),
        ANALOG_MAPPING_RESPONSE => Ok(SysexMessage::AnalogMapping(decode_analog_mapping(body))),
        PIN_STATE_RESPONSE => Ok(decode_pin_state(body)),
        I2C_REPLY => Ok(decode_i2c_reply(body)),
        ONEWIRE_DATA => Ok(SysexMessage::OneWire(onewire::dispatch(payload, version))),
        SCHEDULER_DATA => Ok(SysexMessage::Scheduler(scheduler::dispatch(payload))),
        STEPPER_DATA => Ok(SysexMessage::Stepper(body.to_vec())),
        ACCELSTEPPER_DATA => Ok(SysexMessage::AccelStepper(accel_stepper::dispatch(payload))),
        ENCODER_DATA => Ok(SysexMessage::Encoder(encoder::dispatch(payload))),
        SERIAL_DATA => Ok(SysexMessage::Serial(serial::dispatch(payload))),
        RESERVED_COMMAND => Ok(SysexMessage::Reserved(body.to_vec())),
        other => Ok(SysexMessage::Other {
            opcode: other,
            data: body.to_vec(),
        }),
    }
}

fn decode_string(body: &[u8]) -> Result<String> {
    let bytes = double7_decode(body);
    Ok(std::str::from_utf8(&bytes)?.to_string())
}

/// A short or empty body yields the zero value for whatever field is
/// missing rather than failing the whole decode.
fn decode_report_firmware(body: &[u8]) -> SysexMessage {
    let major = body.first().copied().unwrap_or(0);
    let minor = body.get(1).copied().unwrap_or(0);
    let name = body
        .get(2..)
        .and_then(|rest| decode_string(rest).ok())
        .unwrap_or_default();
    SysexMessage::ReportFirmware { major, minor, name }
}

/// Splits on the `0x7F` sentinel between pins. Each pin's run is terminated
/// by its own `0x7F`, so the payload always ends with one; the empty chunk
/// `split` produces after that final terminator is an artifact of the
/// format, not a pin, and is dropped. Any other empty chunk is a pin that
/// genuinely reported zero capabilities and is kept as an empty
/// `PinCapability`, so positional indexing into the returned `Vec` still
/// lines up with the board's pin numbers.
fn decode_capability(body: &[u8]) -> Vec<PinCapability> {
    let mut chunks: Vec<&[u8]> = body.split(|&b| b == 0x7F).collect();
    if chunks.last().is_some_and(|chunk| chunk.is_empty()) {
        chunks.pop();
    }
    chunks.into_iter().map(PinCapability::deserialize).collect()
}

fn decode_analog_mapping(body: &[u8]) -> Vec<Option<u8>> {
    body.iter()
        .map(|&b| if b == 0x7F { None } else { Some(b) })
        .collect()
}

/// A short body yields `pin: 0`/`mode: None` for whatever field is missing
/// rather than failing the whole decode.
fn decode_pin_state(body: &[u8]) -> SysexMessage {
    let pin = body.first().copied().unwrap_or(0);
    let mode = body.get(1).and_then(|&b| PinMode::try_from_u8(b));
    let mut state: u32 = 0;
    for (i, &b) in body.get(2..).unwrap_or(&[]).iter().enumerate().take(5) {
        state |= u32::from(b & 0x7F) << (7 * i);
    }
    SysexMessage::PinState { pin, mode, state }
}

/// A short body yields `0` for whatever field is missing rather than
/// failing the whole decode; `unpack14` already tolerates a lone leftover
/// byte the same way.
fn decode_i2c_reply(body: &[u8]) -> SysexMessage {
    let address = unpack14(body).unwrap_or(0);
    let after_address = body.get(2..).unwrap_or(&[]);
    let register = unpack14(after_address).unwrap_or(0);
    let mut data = Vec::new();
    let mut rest = after_address.get(2..).unwrap_or(&[]);
    while rest.len() >= 2 {
        data.push(unpack14(&rest[0..2]).unwrap_or(0));
        rest = &rest[2..];
    }
    SysexMessage::I2cReply {
        address,
        register,
        data,
    }
}
