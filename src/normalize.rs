use super::decompose::Decomposition;

/// A value in `1.mantissa_bits x 2^exponent` form. The implicit leading 1 is
/// not stored; `exact` is carried through from the decomposition so the
/// encoder can fold a truncated tail into its sticky bit.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub exponent: i32,
    pub mantissa_bits: Vec<u8>,
    pub exact: bool,
}

/// Locates the binary point. No rounding happens here.
///
/// Returns `None` when no 1 bit exists within the expansion bound, i.e. the
/// value is representationally zero at this precision.
pub fn normalize(dec: &Decomposition) -> Option<Normalized> {
    let int_bits = dec.int_bits();
    if !int_bits.is_empty() {
        // integer magnitude nonzero: point moves left past len-1 digits
        let mut mantissa_bits = int_bits[1..].to_vec();
        mantissa_bits.extend_from_slice(&dec.frac_bits);
        Some(Normalized {
            exponent: int_bits.len() as i32 - 1,
            mantissa_bits,
            exact: dec.exact,
        })
    } else {
        // integer magnitude zero: point moves right to the first 1
        let first_one = dec.frac_bits.iter().position(|&b| b == 1)?;
        Some(Normalized {
            exponent: -(first_one as i32 + 1),
            mantissa_bits: dec.frac_bits[first_one + 1..].to_vec(),
            exact: dec.exact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::decompose::decompose;
    use super::*;

    #[test]
    fn integer_part_sets_exponent() {
        let norm = normalize(&decompose(12.25)).unwrap();
        assert_eq!(norm.exponent, 3);
        assert_eq!(norm.mantissa_bits, vec![1, 0, 0, 0, 1]);
    }

    #[test]
    fn fraction_only_negative_exponent() {
        let norm = normalize(&decompose(0.15625)).unwrap();
        assert_eq!(norm.exponent, -3);
        assert_eq!(norm.mantissa_bits, vec![0, 1]);
    }

    #[test]
    fn exact_power_of_two() {
        let norm = normalize(&decompose(0.5)).unwrap();
        assert_eq!(norm.exponent, -1);
        assert!(norm.mantissa_bits.is_empty());
    }

    #[test]
    fn no_leading_one_is_zero() {
        assert!(normalize(&decompose((2f64).powi(-200))).is_none());
    }
}
