use super::normalize::Normalized;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

pub const EXP_BIAS: i32 = 127;
pub const EXP_MAX: i32 = 255;
pub const MANT_BITS: usize = 23;

const MANT_MASK: u32 = (1 << MANT_BITS) - 1;
const MANT_CARRY: u32 = 1 << MANT_BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Zero,
    Subnormal,
    Normal,
    Infinity,
    NaN,
}

/// The three encoded fields plus the classification they imply.
/// Total width is exactly 32 bits: 1 sign, 8 exponent, 23 mantissa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedFloat {
    pub negative: bool,
    pub exponent: u8,
    pub mantissa: u32,
    pub class: Class,
}

/// What the rounding step decided, for the conversion trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rounding {
    pub guard: bool,
    pub sticky: bool,
    pub rounded_up: bool,
    pub carried: bool,
}

impl EncodedFloat {
    pub fn zero(negative: bool) -> EncodedFloat {
        EncodedFloat {
            negative,
            exponent: 0,
            mantissa: 0,
            class: Class::Zero,
        }
    }

    pub fn infinity(negative: bool) -> EncodedFloat {
        EncodedFloat {
            negative,
            exponent: 0xFF,
            mantissa: 0,
            class: Class::Infinity,
        }
    }

    /// Quiet NaN pattern; the payload beyond the quiet bit is not meaningful.
    pub fn nan(negative: bool) -> EncodedFloat {
        EncodedFloat {
            negative,
            exponent: 0xFF,
            mantissa: 1 << (MANT_BITS - 1),
            class: Class::NaN,
        }
    }

    /// The 32 bit word, sign in the top bit.
    pub fn to_bits(&self) -> u32 {
        (self.negative as u32) << 31
            | (self.exponent as u32) << MANT_BITS
            | (self.mantissa & MANT_MASK)
    }

    /// The word as four big endian bytes.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(4);
        buf.put_u32(self.to_bits());
        buf.freeze()
    }

    /// `sign|exponent(8)|mantissa(23)` as binary digits.
    pub fn field_string(&self) -> String {
        format!(
            "{:01b}|{:08b}|{:023b}",
            self.negative as u32,
            self.exponent,
            self.mantissa
        )
    }
}

impl fmt::Display for EncodedFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:01b} {:08b} {:023b}",
            self.negative as u32,
            self.exponent,
            self.mantissa
        )
    }
}

/// Biases the exponent, classifies, rounds and assembles the fields.
/// `Rounding` is `None` only when classification skipped rounding entirely.
pub fn encode(norm: &Normalized, negative: bool) -> (EncodedFloat, Option<Rounding>) {
    let biased = norm.exponent + EXP_BIAS;
    if biased >= EXP_MAX {
        return (EncodedFloat::infinity(negative), None);
    }
    if biased <= 0 {
        return encode_subnormal(norm, negative, biased);
    }

    let candidate = field_value(&norm.mantissa_bits);
    let (guard, sticky) = guard_sticky(&norm.mantissa_bits, norm.exact);
    let (mantissa, rounded_up, carried) = round_even(candidate, guard, sticky);
    let rounding = Rounding {
        guard,
        sticky,
        rounded_up,
        carried,
    };

    let biased = if carried { biased + 1 } else { biased };
    if biased >= EXP_MAX {
        return (EncodedFloat::infinity(negative), Some(rounding));
    }
    (
        EncodedFloat {
            negative,
            exponent: biased as u8,
            mantissa,
            class: Class::Normal,
        },
        Some(rounding),
    )
}

/// Subnormal encoding: no implicit leading 1 is stored, so the normalized
/// significand (leading 1 restored) is shifted right until the exponent
/// field reads 0, then truncated to 23 bits with the same rounding rule.
fn encode_subnormal(
    norm: &Normalized,
    negative: bool,
    biased: i32,
) -> (EncodedFloat, Option<Rounding>) {
    let shift = (1 - biased) as usize; // >= 1
    let mut digits = Vec::with_capacity(shift + norm.mantissa_bits.len());
    digits.resize(shift - 1, 0);
    digits.push(1);
    digits.extend_from_slice(&norm.mantissa_bits);

    let candidate = field_value(&digits);
    let (guard, sticky) = guard_sticky(&digits, norm.exact);
    let (mantissa, rounded_up, carried) = round_even(candidate, guard, sticky);
    let rounding = Rounding {
        guard,
        sticky,
        rounded_up,
        carried,
    };

    if carried {
        // rounded up into the smallest normal value
        return (
            EncodedFloat {
                negative,
                exponent: 1,
                mantissa: 0,
                class: Class::Normal,
            },
            Some(rounding),
        );
    }
    let class = if mantissa == 0 {
        Class::Zero
    } else {
        Class::Subnormal
    };
    (
        EncodedFloat {
            negative,
            exponent: 0,
            mantissa,
            class,
        },
        Some(rounding),
    )
}

/// First 23 digits as an integer, zero padded on the right.
fn field_value(bits: &[u8]) -> u32 {
    let mut v = 0;
    for i in 0..MANT_BITS {
        v = (v << 1) | u32::from(*bits.get(i).unwrap_or(&0));
    }
    v
}

/// Guard is digit 24; sticky is the OR of everything past it, plus any tail
/// the expansion truncated away.
fn guard_sticky(bits: &[u8], exact: bool) -> (bool, bool) {
    let guard = bits.get(MANT_BITS) == Some(&1);
    let sticky = !exact
        || bits.len() > MANT_BITS + 1 && bits[MANT_BITS + 1..].iter().any(|&b| b == 1);
    (guard, sticky)
}

/// Round to nearest even on the 23 bit candidate. Returns the rounded field,
/// whether it moved up, and whether the increment carried out of the field.
fn round_even(candidate: u32, guard: bool, sticky: bool) -> (u32, bool, bool) {
    let round_up = guard && (sticky || candidate & 1 == 1);
    if !round_up {
        return (candidate, false, false);
    }
    let raised = candidate + 1;
    if raised & MANT_CARRY != 0 {
        (0, true, true)
    } else {
        (raised, true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(exponent: i32, mantissa_bits: Vec<u8>) -> Normalized {
        Normalized {
            exponent,
            mantissa_bits,
            exact: true,
        }
    }

    #[test]
    fn exact_dyadic_value() {
        // 0.15625 = 1.01 x 2^-3
        let (enc, rounding) = encode(&norm(-3, vec![0, 1]), false);
        assert_eq!(enc.exponent, 124);
        assert_eq!(enc.mantissa, 0x200000);
        assert_eq!(enc.class, Class::Normal);
        let r = rounding.unwrap();
        assert!(!r.guard && !r.sticky && !r.rounded_up);
    }

    #[test]
    fn tie_rounds_to_even_lsb_zero() {
        // candidate ...0, guard 1, sticky 0: stay down
        let mut bits = vec![0; 23];
        bits.push(1);
        let (enc, rounding) = encode(&norm(0, bits), false);
        assert_eq!(enc.mantissa, 0);
        assert!(!rounding.unwrap().rounded_up);
    }

    #[test]
    fn tie_rounds_to_even_lsb_one() {
        // candidate ...01, guard 1, sticky 0: move up to ...10
        let mut bits = vec![0; 22];
        bits.push(1);
        bits.push(1);
        let (enc, rounding) = encode(&norm(0, bits), false);
        assert_eq!(enc.mantissa, 0b10);
        assert!(rounding.unwrap().rounded_up);
    }

    #[test]
    fn carry_propagates_into_exponent() {
        let mut bits = vec![1; 23];
        bits.push(1);
        let (enc, rounding) = encode(&norm(0, bits), false);
        assert_eq!(enc.mantissa, 0);
        assert_eq!(enc.exponent, 128);
        assert!(rounding.unwrap().carried);
    }

    #[test]
    fn carry_at_top_becomes_infinity() {
        let mut bits = vec![1; 23];
        bits.push(1);
        let (enc, _) = encode(&norm(127, bits), false);
        assert_eq!(enc.class, Class::Infinity);
        assert_eq!(enc.exponent, 0xFF);
        assert_eq!(enc.mantissa, 0);
    }

    #[test]
    fn subnormal_keeps_leading_digit() {
        // 2^-127 = half the smallest normal: mantissa 100...0, exponent 0
        let (enc, _) = encode(&norm(-127, vec![]), false);
        assert_eq!(enc.class, Class::Subnormal);
        assert_eq!(enc.exponent, 0);
        assert_eq!(enc.mantissa, 0x400000);
    }

    #[test]
    fn subnormal_carry_promotes_to_normal() {
        // 2^-126 - 2^-150 rounds up into the smallest normal value
        let (enc, rounding) = encode(&norm(-127, vec![1; 23]), false);
        assert_eq!(enc.class, Class::Normal);
        assert_eq!(enc.exponent, 1);
        assert_eq!(enc.mantissa, 0);
        assert!(rounding.unwrap().carried);
    }

    #[test]
    fn subnormal_rounding_to_nothing_is_zero() {
        // 2^-150: tie against zero, even neighbour is zero
        let (enc, rounding) = encode(&norm(-150, vec![]), true);
        assert_eq!(enc.class, Class::Zero);
        assert_eq!(enc.to_bits(), 0x8000_0000);
        let r = rounding.unwrap();
        assert!(r.guard && !r.sticky && !r.rounded_up);
    }

    #[test]
    fn word_assembly() {
        let enc = EncodedFloat {
            negative: false,
            exponent: 124,
            mantissa: 0x200000,
            class: Class::Normal,
        };
        assert_eq!(enc.to_bits(), 0.15625f32.to_bits());
        assert_eq!(enc.to_bytes().as_ref(), &[0x3E, 0x20, 0x00, 0x00]);
        assert_eq!(enc.field_string(), "0|01111100|01000000000000000000000");
    }
}
