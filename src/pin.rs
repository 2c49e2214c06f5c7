//! Pin-mode vocabulary used to label `CAPABILITY_RESPONSE` and
//! `PIN_STATE_RESPONSE` payloads.
//!
//! This crate does not track board state (that supervisor lives outside the
//! codec); these types exist only to give the dispatcher's output shapes
//! meaningful fields.

use crate::error::{FirmataError, Result};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PinMode {
    Input = 0,
    Output = 1,
    Analog = 2,
    Pwm = 3,
    Servo = 4,
    Shift = 5,
    I2c = 6,
    Onewire = 7,
    Stepper = 8,
    Encoder = 9,
    Serial = 10,
    Pullup = 11,
}

impl PinMode {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Input),
            1 => Ok(Self::Output),
            2 => Ok(Self::Analog),
            3 => Ok(Self::Pwm),
            4 => Ok(Self::Servo),
            5 => Ok(Self::Shift),
            6 => Ok(Self::I2c),
            7 => Ok(Self::Onewire),
            8 => Ok(Self::Stepper),
            9 => Ok(Self::Encoder),
            10 => Ok(Self::Serial),
            11 => Ok(Self::Pullup),
            other => Err(FirmataError::ParseError(
                "unrecognized pin mode byte",
                vec![other],
            )),
        }
    }

    /// Best-effort lookup for `PIN_STATE_RESPONSE`, which echoes back a mode
    /// byte but tolerates unknown boards reporting modes this crate doesn't
    /// enumerate; falls back to `None` instead of failing decode.
    #[must_use]
    pub fn try_from_u8(value: u8) -> Option<Self> {
        Self::from_u8(value).ok()
    }
}

/// One `(mode, resolution)` entry as reported by `CAPABILITY_RESPONSE`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub mode: PinMode,
    pub resolution: u8,
}

/// The set of modes a single pin supports, as reported by
/// `CAPABILITY_RESPONSE`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinCapability {
    pub modes: Vec<Mode>,
}

impl PinCapability {
    /// Parses one pin's `(mode, resolution)` run, already split on the
    /// `0x7F` sentinel by the caller. Unknown mode bytes are skipped rather
    /// than rejecting the whole capability response, since firmware
    /// revisions occasionally report modes a given client doesn't know. A
    /// trailing byte with no matching resolution (an odd-length run) is
    /// dropped rather than rejecting the whole entry.
    #[must_use]
    pub fn deserialize(bytes: &[u8]) -> Self {
        let mut modes = Vec::with_capacity(bytes.len() / 2);
        for pair in bytes.chunks_exact(2) {
            if let Some(mode) = PinMode::try_from_u8(pair[0]) {
                modes.push(Mode {
                    mode,
                    resolution: pair[1],
                });
            }
        }
        Self { modes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_mode_roundtrips() {
        for raw in 0..=11u8 {
            let mode = PinMode::from_u8(raw).unwrap();
            assert_eq!(mode.to_u8(), raw);
        }
    }

    #[test]
    fn pin_mode_rejects_unknown() {
        assert!(PinMode::from_u8(200).is_err());
        assert_eq!(PinMode::try_from_u8(200), None);
    }

    #[test]
    fn capability_deserialize_pairs() {
        let cap = PinCapability::deserialize(&[0, 1, 1, 1]);
        assert_eq!(cap.modes.len(), 2);
        assert_eq!(cap.modes[0].mode, PinMode::Input);
        assert_eq!(cap.modes[1].mode, PinMode::Output);
    }

    #[test]
    fn capability_deserialize_drops_trailing_odd_byte() {
        let cap = PinCapability::deserialize(&[0, 1, 1]);
        assert_eq!(cap.modes.len(), 1);
        assert_eq!(cap.modes[0].mode, PinMode::Input);
    }
}
