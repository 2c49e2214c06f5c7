//! Protocol version table and negotiator.
//!
//! An immutable constant table owned by this module: an enumerated
//! [`ProtocolVersion`] tag plus a command vocabulary where each entry
//! records the version it was introduced in. Newer versions are supersets
//! of older ones, so a lookup for version `v` only matches commands with
//! `introduced_in <= v`; the 1-Wire `id` field's own version gating is
//! narrower than a whole-command cutover, so it stays a separate predicate
//! method rather than living in this table.

use crate::constants::*;

/// A supported Firmata protocol version tag. Comparable lexicographically,
/// matching the wire tags' own ordering (`V_2_01` < `V_2_02` < ...).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProtocolVersion {
    V2_01,
    V2_02,
    V2_03,
    V2_04,
    V2_05,
    V2_06,
}

impl ProtocolVersion {
    /// All versions this crate knows about, oldest first.
    pub const ALL: [ProtocolVersion; 6] = [
        ProtocolVersion::V2_01,
        ProtocolVersion::V2_02,
        ProtocolVersion::V2_03,
        ProtocolVersion::V2_04,
        ProtocolVersion::V2_05,
        ProtocolVersion::V2_06,
    ];

    /// The documented minimum version, used when a reported tag sorts
    /// below every known version.
    pub const MINIMUM: ProtocolVersion = ProtocolVersion::V2_01;

    /// The newest version this crate implements; the default for a
    /// freshly-created session.
    pub const LATEST: ProtocolVersion = ProtocolVersion::V2_06;

    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            ProtocolVersion::V2_01 => "V_2_01",
            ProtocolVersion::V2_02 => "V_2_02",
            ProtocolVersion::V2_03 => "V_2_03",
            ProtocolVersion::V2_04 => "V_2_04",
            ProtocolVersion::V2_05 => "V_2_05",
            ProtocolVersion::V2_06 => "V_2_06",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_tag() == tag)
    }

    /// Whether a 1-Wire READ request on this version carries the 2-byte
    /// correlation id introduced after V_2_04.
    #[must_use]
    pub const fn onewire_has_correlation_id(self) -> bool {
        !matches!(self, ProtocolVersion::V2_04)
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

/// Returns the highest known version `<=` the reported tag, falling back to
/// [`ProtocolVersion::MINIMUM`] when nothing known is that low.
#[must_use]
pub fn negotiate_version(reported_tag: &str) -> ProtocolVersion {
    if let Some(exact) = ProtocolVersion::from_tag(reported_tag) {
        return exact;
    }
    ProtocolVersion::ALL
        .into_iter()
        .filter(|v| v.as_tag() < reported_tag)
        .max()
        .unwrap_or(ProtocolVersion::MINIMUM)
}

/// One entry in the command vocabulary: a symbolic name paired with its
/// wire opcode and the version it first appears in.
struct Command {
    name: &'static str,
    opcode: u8,
    introduced_in: ProtocolVersion,
}

const COMMANDS: &[Command] = &[
    Command { name: "DIGITAL_MESSAGE", opcode: DIGITAL_MESSAGE, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "ANALOG_MESSAGE", opcode: ANALOG_MESSAGE, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "REPORT_ANALOG", opcode: REPORT_ANALOG, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "REPORT_DIGITAL", opcode: REPORT_DIGITAL, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "PIN_MODE", opcode: PIN_MODE, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "DIGITAL_PIN_WRITE", opcode: DIGITAL_PIN_WRITE, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "REPORT_VERSION", opcode: PROTOCOL_VERSION, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "SYSTEM_RESET", opcode: SYSTEM_RESET, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "START_SYSEX", opcode: START_SYSEX, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "END_SYSEX", opcode: END_SYSEX, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "ANALOG_MAPPING_QUERY", opcode: ANALOG_MAPPING_QUERY, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "ANALOG_MAPPING_RESPONSE", opcode: ANALOG_MAPPING_RESPONSE, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "CAPABILITY_QUERY", opcode: CAPABILITY_QUERY, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "CAPABILITY_RESPONSE", opcode: CAPABILITY_RESPONSE, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "PIN_STATE_QUERY", opcode: PIN_STATE_QUERY, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "PIN_STATE_RESPONSE", opcode: PIN_STATE_RESPONSE, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "EXTENDED_ANALOG", opcode: EXTENDED_ANALOG, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "SERVO_CONFIG", opcode: SERVO_CONFIG, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "STRING_DATA", opcode: STRING_DATA, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "SHIFT_DATA", opcode: SHIFT_DATA, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "I2C_REQUEST", opcode: I2C_REQUEST, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "I2C_REPLY", opcode: I2C_REPLY, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "I2C_CONFIG", opcode: I2C_CONFIG, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "REPORT_FIRMWARE", opcode: REPORT_FIRMWARE, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "SAMPLING_INTERVAL", opcode: SAMPLING_INTERVAL, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "RESERVED_COMMAND", opcode: RESERVED_COMMAND, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "SYSEX_NON_REALTIME", opcode: SYSEX_NON_REALTIME, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "SYSEX_REALTIME", opcode: SYSEX_REALTIME, introduced_in: ProtocolVersion::V2_01 },
    Command { name: "ONEWIRE_DATA", opcode: ONEWIRE_DATA, introduced_in: ProtocolVersion::V2_02 },
    Command { name: "STEPPER_DATA", opcode: STEPPER_DATA, introduced_in: ProtocolVersion::V2_02 },
    Command { name: "SERIAL_DATA", opcode: SERIAL_DATA, introduced_in: ProtocolVersion::V2_04 },
    Command { name: "ENCODER_DATA", opcode: ENCODER_DATA, introduced_in: ProtocolVersion::V2_05 },
    Command { name: "ACCELSTEPPER_DATA", opcode: ACCELSTEPPER_DATA, introduced_in: ProtocolVersion::V2_05 },
    Command { name: "SCHEDULER_DATA", opcode: SCHEDULER_DATA, introduced_in: ProtocolVersion::V2_05 },
];

/// Looks up a command's wire opcode by its symbolic name, restricted to
/// commands introduced at or before `version`. A command negotiated away on
/// an older connection (e.g. `SCHEDULER_DATA` against `V2_04`) is invisible
/// here rather than returning an opcode the peer wouldn't recognize.
#[must_use]
pub fn name_to_opcode(version: ProtocolVersion, name: &str) -> Option<u8> {
    COMMANDS
        .iter()
        .find(|c| c.name == name && version >= c.introduced_in)
        .map(|c| c.opcode)
}

/// Looks up a full-byte command's symbolic name by its wire opcode,
/// restricted to commands introduced at or before `version`. Short messages
/// that embed a nibble (analog/digital/report-analog/report-digital) should
/// mask the byte to its row constant before calling this.
#[must_use]
pub fn opcode_to_name(version: ProtocolVersion, opcode: u8) -> Option<&'static str> {
    COMMANDS
        .iter()
        .find(|c| c.opcode == opcode && version >= c.introduced_in)
        .map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiate_exact_match() {
        assert_eq!(negotiate_version("V_2_03"), ProtocolVersion::V2_03);
    }

    #[test]
    fn negotiate_above_known_range() {
        assert_eq!(negotiate_version("V_2_99"), ProtocolVersion::V2_06);
    }

    #[test]
    fn negotiate_below_known_range() {
        assert_eq!(negotiate_version("V_2_00"), ProtocolVersion::V2_01);
    }

    #[test]
    fn onewire_id_gating() {
        assert!(!ProtocolVersion::V2_04.onewire_has_correlation_id());
        assert!(ProtocolVersion::V2_05.onewire_has_correlation_id());
        assert!(ProtocolVersion::V2_03.onewire_has_correlation_id());
    }

    #[test]
    fn name_opcode_roundtrip() {
        let v = ProtocolVersion::LATEST;
        assert_eq!(name_to_opcode(v, "CAPABILITY_RESPONSE"), Some(CAPABILITY_RESPONSE));
        assert_eq!(opcode_to_name(v, CAPABILITY_RESPONSE), Some("CAPABILITY_RESPONSE"));
        assert_eq!(name_to_opcode(v, "NOT_A_COMMAND"), None);
    }

    #[test]
    fn older_versions_do_not_know_newer_commands() {
        assert_eq!(name_to_opcode(ProtocolVersion::V2_04, "SCHEDULER_DATA"), None);
        assert_eq!(
            opcode_to_name(ProtocolVersion::V2_04, SCHEDULER_DATA),
            None
        );
        assert_eq!(
            name_to_opcode(ProtocolVersion::V2_05, "SCHEDULER_DATA"),
            Some(SCHEDULER_DATA)
        );
    }

    #[test]
    fn core_commands_are_known_to_every_version() {
        for v in ProtocolVersion::ALL {
            assert_eq!(name_to_opcode(v, "PIN_MODE"), Some(PIN_MODE));
        }
    }
}
