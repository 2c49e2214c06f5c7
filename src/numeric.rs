//! Pure numeric codecs shared by every feature subsystem.
//!
//! None of these fail on well-formed input; they are total functions over
//! byte sequences. Diagnostics that would otherwise be printed directly
//! (see the custom float encoder) go through `log::trace!` instead.

/// Decodes a 14-bit LSB/MSB pair into an integer. Tolerant of a truncated
/// pair: with only `lsb` present it returns `lsb` as the value.
pub fn unpack14(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [] => None,
        [lsb] => Some(u16::from(*lsb)),
        [lsb, msb, ..] => Some((u16::from(*msb) << 7) | (u16::from(*lsb) & 0x7F)),
    }
}

/// Encodes a value `< 2^14` as a two-byte LSB/MSB pair.
pub fn pack14(value: u16) -> [u8; 2] {
    [(value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8]
}

/// Splits each source byte into a low-7-bits, high-1-bit pair of wire bytes.
/// This is the "double 7-bit" encoding used by STRING_DATA and similar
/// payloads that carry arbitrary 8-bit bytes over a 7-bit-clean channel.
pub fn double7_encode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(b & 0x7F);
        out.push((b >> 7) & 0x7F);
    }
    out
}

/// Inverse of [`double7_encode`]. A trailing odd byte (no matching high
/// byte) is dropped.
pub fn double7_decode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() / 2);
    let mut chunks = bytes.chunks_exact(2);
    for pair in &mut chunks {
        out.push(pair[0] | (pair[1] << 7));
    }
    out
}

/// Packs an 8-bit-per-byte stream into 7-bit wire bytes, LSB-first across
/// byte boundaries. Output length is `ceil(bytes.len() * 8 / 7)`.
pub fn pack7(bytes: &[u8]) -> Vec<u8> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let total_bits = bytes.len() * 8;
    let out_len = (total_bits + 6) / 7;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let bit_start = i * 7;
        let mut chunk: u16 = 0;
        for bit in 0..7 {
            let src_bit = bit_start + bit;
            if src_bit >= total_bits {
                break;
            }
            let byte_idx = src_bit / 8;
            let bit_idx = src_bit % 8;
            if (bytes[byte_idx] >> bit_idx) & 1 != 0 {
                chunk |= 1 << bit;
            }
        }
        out.push((chunk & 0x7F) as u8);
    }
    out
}

/// Inverse of [`pack7`]. Output length is `(bytes.len() * 7) >> 3`.
pub fn unpack7(bytes: &[u8]) -> Vec<u8> {
    let total_bits = bytes.len() * 7;
    let out_len = total_bits >> 3;
    let mut out = vec![0u8; out_len];
    for (i, b) in bytes.iter().enumerate() {
        let bit_start = i * 7;
        for bit in 0..7 {
            let dst_bit = bit_start + bit;
            if dst_bit >= out_len * 8 {
                break;
            }
            if (b >> bit) & 1 != 0 {
                let byte_idx = dst_bit / 8;
                let bit_idx = dst_bit % 8;
                out[byte_idx] |= 1 << bit_idx;
            }
        }
    }
    out
}

/// Encodes a signed 32-bit value as 5 wire bytes: the magnitude in 7-bit
/// chunks across the first 4 bytes, with the sign folded into bit 3 of the
/// 5th byte.
///
/// The wire format has 31 magnitude bits (28 in the first four 7-bit chunks
/// plus 3 in the low bits of the fifth byte), so it can only represent
/// magnitudes up to `2^31 - 1`. `i32::MIN`'s magnitude is `2^31`, one past
/// that ceiling, so `encode32(i32::MIN)` silently drops the missing bit and
/// produces the same five bytes as `encode32(0)`; decoding them back then
/// yields `0`, not `i32::MIN`. This mirrors the encoder's handling of custom
/// float exponents that fall outside the representable range: there is no
/// documented wire value for this boundary case, so this function narrows
/// rather than rejects.
pub fn encode32(value: i32) -> [u8; 5] {
    let magnitude = value.unsigned_abs();
    let sign_bit = u32::from(value < 0);
    [
        (magnitude & 0x7F) as u8,
        ((magnitude >> 7) & 0x7F) as u8,
        ((magnitude >> 14) & 0x7F) as u8,
        ((magnitude >> 21) & 0x7F) as u8,
        (((magnitude >> 28) & 0x07) | (sign_bit << 3)) as u8,
    ]
}

/// Inverse of [`encode32`]. Preserves the source's sign-of-zero semantics:
/// a zero magnitude with the sign bit set decodes to `0`, not `-0`.
pub fn decode32(bytes: &[u8; 5]) -> i32 {
    let magnitude: u32 = u32::from(bytes[0] & 0x7F)
        | (u32::from(bytes[1] & 0x7F) << 7)
        | (u32::from(bytes[2] & 0x7F) << 14)
        | (u32::from(bytes[3] & 0x7F) << 21)
        | (u32::from(bytes[4] & 0x07) << 28);
    let negative = bytes[4] & 0x08 != 0;
    let mut result = magnitude as i32;
    if negative {
        result *= -1;
    }
    result
}

const FLOAT_EXPONENT_BIAS: i32 = 11;

/// Encodes a speed/acceleration value using the AccelStepper subprotocol's
/// custom float: a sign bit, a 4-bit biased (bias 11) decimal exponent, and
/// a 23-bit significand, packed into 4 wire bytes.
///
/// Behavior at magnitudes whose biased exponent falls outside `0..=15` is
/// not fully pinned down by the protocol documentation; this encoder
/// clamps the exponent to that range rather than silently wrapping it,
/// logging the clamp at `log::warn!` level.
pub fn encode_float(value: f64) -> [u8; 4] {
    if value == 0.0 {
        return [0, 0, 0, 0];
    }
    let sign: u8 = u8::from(value < 0.0);
    let mut magnitude = value.abs();
    let mut exponent = magnitude.log10().floor() as i32;

    while magnitude.fract() != 0.0 && magnitude < 8_388_608.0 {
        magnitude *= 10.0;
        exponent -= 1;
    }
    while magnitude > 8_388_608.0 {
        magnitude /= 10.0;
        exponent += 1;
    }

    let integer = magnitude.trunc() as u32 & 0x007F_FFFF;
    let mut biased_exponent = exponent + FLOAT_EXPONENT_BIAS;
    if !(0..=15).contains(&biased_exponent) {
        log::warn!(
            "custom float exponent {biased_exponent} out of representable range, clamping"
        );
        biased_exponent = biased_exponent.clamp(0, 15);
    }
    let biased_exponent = biased_exponent as u32;

    [
        (integer & 0x7F) as u8,
        ((integer >> 7) & 0x7F) as u8,
        ((integer >> 14) & 0x7F) as u8,
        (((integer >> 21) & 0x03) | ((biased_exponent & 0x0F) << 2) | (u32::from(sign) << 6)) as u8,
    ]
}

/// Decodes the AccelStepper custom float. Not specified by the upstream
/// documented directly anywhere; derived as the inverse of [`encode_float`].
pub fn decode_float(bytes: &[u8; 4]) -> f64 {
    if bytes == &[0, 0, 0, 0] {
        return 0.0;
    }
    let integer: u32 = u32::from(bytes[0] & 0x7F)
        | (u32::from(bytes[1] & 0x7F) << 7)
        | (u32::from(bytes[2] & 0x7F) << 14)
        | ((u32::from(bytes[3]) & 0x03) << 21);
    let biased_exponent = (bytes[3] >> 2) & 0x0F;
    let sign = (bytes[3] >> 6) & 0x01;
    let exponent = i32::from(biased_exponent) - FLOAT_EXPONENT_BIAS;
    let magnitude = f64::from(integer) * 10f64.powi(exponent);
    if sign == 1 {
        -magnitude
    } else {
        magnitude
    }
}

/// A 1-Wire device address: family code, 6-byte identity, CRC.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneWireAddress {
    pub family: u8,
    pub identity: [u8; 6],
    pub crc: u8,
}

impl OneWireAddress {
    pub fn pack(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0] = self.family;
        out[1..7].copy_from_slice(&self.identity);
        out[7] = self.crc;
        out
    }

    /// Unpacks an 8-byte device address. Returns `None` if fewer than 8
    /// bytes remain.
    pub fn unpack(bytes: &[u8]) -> Option<(Self, &[u8])> {
        if bytes.len() < 8 {
            return None;
        }
        let (head, rest) = bytes.split_at(8);
        let mut identity = [0u8; 6];
        identity.copy_from_slice(&head[1..7]);
        Some((
            Self {
                family: head[0],
                identity,
                crc: head[7],
            },
            rest,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack14_roundtrips_full_range() {
        for v in 0..(1u16 << 14) {
            let packed = pack14(v);
            assert_eq!(unpack14(&packed), Some(v));
        }
    }

    #[test]
    fn unpack14_tolerates_single_byte() {
        assert_eq!(unpack14(&[0x42]), Some(0x42));
        assert_eq!(unpack14(&[]), None);
    }

    #[test]
    fn double7_roundtrips() {
        let src: Vec<u8> = (0..=255).collect();
        let encoded = double7_encode(&src);
        assert_eq!(encoded.len(), src.len() * 2);
        assert_eq!(double7_decode(&encoded), src);
    }

    #[test]
    fn pack7_unpack7_roundtrip_preserves_bits() {
        let src = [0xFFu8, 0xFF];
        let packed = pack7(&src);
        assert_eq!(packed[0], 0x7F);
        let unpacked = unpack7(&packed);
        assert_eq!(unpacked, vec![0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn pack7_unpack7_roundtrip_arbitrary() {
        let src: Vec<u8> = (0..37).map(|i| (i * 7 + 3) as u8).collect();
        let packed = pack7(&src);
        let unpacked = unpack7(&packed);
        assert!(unpacked.starts_with(&src));
    }

    #[test]
    fn encode32_decode32_roundtrip() {
        for v in [0, 1, -1, i32::MIN + 1, (1 << 28) - 1, -((1 << 28) - 1)] {
            let encoded = encode32(v);
            assert_eq!(decode32(&encoded), v, "value {v}");
        }
    }

    #[test]
    fn encode32_cannot_represent_i32_min() {
        // i32::MIN's magnitude (2^31) is one bit past the wire format's
        // 31-bit magnitude ceiling, so it encodes as if it were zero.
        assert_eq!(encode32(i32::MIN), encode32(0));
        assert_eq!(decode32(&encode32(i32::MIN)), 0);
    }

    #[test]
    fn encode32_matches_known_negative_one_encoding() {
        assert_eq!(encode32(-1), [0x7F, 0x7F, 0x7F, 0x7F, 0x0F]);
        assert_eq!(decode32(&[0x7F, 0x7F, 0x7F, 0x7F, 0x0F]), -1);
    }

    #[test]
    fn float_roundtrips_typical_speeds() {
        for v in [0.0, 1.0, -1.0, 200.5, -4000.0, 0.001] {
            let encoded = encode_float(v);
            let decoded = decode_float(&encoded);
            let tolerance = (v.abs() * 0.001).max(1e-6);
            assert!(
                (decoded - v).abs() <= tolerance,
                "expected {v}, got {decoded}"
            );
        }
    }

    #[test]
    fn onewire_address_roundtrips() {
        let addr = OneWireAddress {
            family: 0x28,
            identity: [1, 2, 3, 4, 5, 6],
            crc: 0x99,
        };
        let packed = addr.pack();
        let (parsed, rest) = OneWireAddress::unpack(&packed).unwrap();
        assert_eq!(parsed, addr);
        assert!(rest.is_empty());
    }
}
