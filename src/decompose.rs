use log::debug;

/// Upper bound on the fractional binary expansion.
///
/// Single precision subnormals place their first significant bit up to 149
/// positions after the binary point, so the deepest guard/sticky decision
/// sits at bit 173. 180 keeps every rounding decision inside the expansion;
/// anything truncated past the cap is folded into the sticky bit.
pub const MAX_FRAC_BITS: usize = 180;

/// A finite nonzero value split into sign, integer magnitude and a bounded
/// binary expansion of the fractional remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub negative: bool,
    pub int_mag: u128,
    pub frac_bits: Vec<u8>,
    pub exact: bool,
}

impl Decomposition {
    /// Binary digits of the integer magnitude, most significant first.
    /// Empty for a zero magnitude.
    pub fn int_bits(&self) -> Vec<u8> {
        if self.int_mag == 0 {
            return vec![];
        }
        let len = 128 - self.int_mag.leading_zeros();
        (0..len).rev().map(|i| ((self.int_mag >> i) & 1) as u8).collect()
    }
}

/// Splits `value` into a `Decomposition`. The fractional remainder is
/// expanded by repeated doubling: each step emits the bit that crosses 1.
///
/// Callers screen out zero, NaN, infinity and magnitudes at or above 2^128
/// before this point, so the floor always fits in the `u128` magnitude.
pub fn decompose(value: f64) -> Decomposition {
    let negative = value.is_sign_negative();
    let abs = value.abs();
    let int_part = abs.floor();
    let int_mag = int_part as u128;

    let mut frac = abs - int_part;
    let mut frac_bits = Vec::new();
    let mut exact = frac == 0.0;
    while !exact && frac_bits.len() < MAX_FRAC_BITS {
        frac *= 2.0;
        if frac >= 1.0 {
            frac_bits.push(1);
            frac -= 1.0;
        } else {
            frac_bits.push(0);
        }
        exact = frac == 0.0;
    }

    if exact {
        debug!("fraction terminated exactly after {} bit(s)", frac_bits.len());
    } else {
        debug!("fraction truncated at {} bits, remainder {}", MAX_FRAC_BITS, frac);
    }

    Decomposition {
        negative,
        int_mag,
        frac_bits,
        exact,
    }
}
