//! Serial passthrough subprotocol. The port number lives in the low 4 bits
//! of the command byte, OR'd with one of the `SERIAL_*` command constants.

use crate::constants::*;
use crate::error::{FirmataError, Result};
use crate::numeric::{double7_decode, double7_encode, pack14};

fn command_byte(command: u8, port: u8) -> Result<u8> {
    if port & !SERIAL_PORT_MASK != 0 {
        return Err(FirmataError::InvalidArgument(
            "serial port number must fit in 4 bits",
        ));
    }
    Ok(command | (port & SERIAL_PORT_MASK))
}

/// Builds `CONFIG`: sets `port`'s baud rate (21-bit, three 7-bit bytes) and,
/// for software-serial ports, the rx/tx pin pair.
pub fn config(port: u8, baud: u32, rx_tx_pins: Option<(u8, u8)>) -> Result<Vec<u8>> {
    if baud >= 1 << 21 {
        return Err(FirmataError::InvalidArgument(
            "serial baud rate exceeds 21 bits",
        ));
    }
    let mut out = vec![SERIAL_DATA, command_byte(SERIAL_CONFIG, port)?];
    out.push((baud & 0x7F) as u8);
    out.push(((baud >> 7) & 0x7F) as u8);
    out.push(((baud >> 14) & 0x7F) as u8);
    if let Some((rx, tx)) = rx_tx_pins {
        out.push(rx);
        out.push(tx);
    }
    Ok(out)
}

/// Builds `WRITE`: writes `data` (double-7-bit encoded) to `port`.
pub fn write(port: u8, data: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![SERIAL_DATA, command_byte(SERIAL_WRITE, port)?];
    out.extend(double7_encode(data));
    Ok(out)
}

/// Builds `READ`: starts (`max_bytes = None` or `Some(n)`) or stops
/// continuous reading on `port`.
pub fn read(port: u8, stop: bool, max_bytes: Option<u16>) -> Result<Vec<u8>> {
    let mut out = vec![SERIAL_DATA, command_byte(SERIAL_READ, port)?];
    out.push(if stop {
        SERIAL_READ_STOP
    } else {
        SERIAL_READ_CONTINUOUS
    });
    if let Some(n) = max_bytes {
        out.extend_from_slice(&pack14(n));
    }
    Ok(out)
}

/// Builds `CLOSE`: releases `port`.
pub fn close(port: u8) -> Result<Vec<u8>> {
    Ok(vec![SERIAL_DATA, command_byte(SERIAL_CLOSE, port)?])
}

/// Builds `FLUSH`: discards `port`'s buffered input.
pub fn flush(port: u8) -> Result<Vec<u8>> {
    Ok(vec![SERIAL_DATA, command_byte(SERIAL_FLUSH, port)?])
}

/// Builds `LISTEN`: for software-serial ports, makes `port` the one
/// actively listening (only one can listen at a time on most boards).
pub fn listen(port: u8) -> Result<Vec<u8>> {
    Ok(vec![SERIAL_DATA, command_byte(SERIAL_LISTEN, port)?])
}

/// A decoded `REPLY`: the port it came from and the double-7-bit-decoded
/// payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialReply {
    pub port: u8,
    pub data: Vec<u8>,
}

/// A decoded serial message.
#[derive(Debug, Clone, PartialEq)]
pub enum SerialMessage {
    Reply(SerialReply),
    Other { command: u8, port: u8, data: Vec<u8> },
}

/// Dispatches an already-unwrapped `SERIAL_DATA` payload.
#[must_use]
pub fn dispatch(payload: &[u8]) -> SerialMessage {
    let Some(&command_and_port) = payload.get(1) else {
        return SerialMessage::Other {
            command: 0,
            port: 0,
            data: Vec::new(),
        };
    };
    let command = command_and_port & !SERIAL_PORT_MASK;
    let port = command_and_port & SERIAL_PORT_MASK;
    let body = payload.get(2..).unwrap_or(&[]);

    if command == SERIAL_REPLY {
        SerialMessage::Reply(SerialReply {
            port,
            data: double7_decode(body),
        })
    } else {
        SerialMessage::Other {
            command,
            port,
            data: body.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_oversized_baud() {
        assert!(config(0, 1 << 21, None).is_err());
        assert!(config(0, (1 << 21) - 1, None).is_ok());
    }

    #[test]
    fn config_rejects_oversized_port() {
        assert!(config(16, 9600, None).is_err());
    }

    #[test]
    fn write_double7_encodes_payload() {
        let bytes = write(2, &[0xFF]).unwrap();
        assert_eq!(bytes[0], SERIAL_DATA);
        assert_eq!(bytes[1], SERIAL_WRITE | 2);
        assert_eq!(&bytes[2..], &[0x7F, 0x01]);
    }

    #[test]
    fn dispatch_decodes_reply_payload() {
        let mut payload = vec![SERIAL_DATA, SERIAL_REPLY | 3];
        payload.extend_from_slice(&[0x7F, 0x01]);
        match dispatch(&payload) {
            SerialMessage::Reply(reply) => {
                assert_eq!(reply.port, 3);
                assert_eq!(reply.data, vec![0xFF]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
