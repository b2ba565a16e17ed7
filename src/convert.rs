use super::decompose::{decompose, MAX_FRAC_BITS};
use super::encode::{encode, Class, EncodedFloat, EXP_BIAS};
use super::normalize::normalize;
use super::trace::{bit_string, Step, Trace};
use log::debug;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    EmptyInput,
    MalformedNumeral(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConvertError::EmptyInput => write!(f, "no input provided"),
            ConvertError::MalformedNumeral(text) => {
                write!(f, "not a valid number: {:?}", text)
            }
        }
    }
}

impl Error for ConvertError {}

/// The result of one conversion: the input as parsed, the encoded fields and
/// the ordered trace of decisions that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub value: f64,
    pub encoded: EncodedFloat,
    pub trace: Trace,
}

impl Conversion {
    /// The platform's own single precision pattern for the same input,
    /// usable as a correctness oracle.
    pub fn native_bits(&self) -> u32 {
        (self.value as f32).to_bits()
    }

    pub fn matches_native(&self) -> bool {
        if self.encoded.class == Class::NaN {
            return (self.value as f32).is_nan();
        }
        self.encoded.to_bits() == self.native_bits()
    }
}

/// Parses one decimal numeral and converts it. Empty and malformed text are
/// rejected before any encoding work begins; NaN and infinity parse fine and
/// take the shortcut paths.
pub fn convert_str(text: &str) -> Result<Conversion, ConvertError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConvertError::EmptyInput);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ConvertError::MalformedNumeral(trimmed.to_string()))?;
    Ok(convert(value))
}

// Magnitudes at or above 2^128 would bias past the exponent range, and their
// integer part would not fit the decomposition. They overflow straight away.
fn overflow_limit() -> f64 {
    (2f64).powi(128)
}

/// Runs the full pipeline on an already-parsed value. Infallible: every
/// input, including NaN and the infinities, has a defined encoding.
pub fn convert(value: f64) -> Conversion {
    let mut trace = Trace::new();
    let negative = value.is_sign_negative();

    if value.is_nan() {
        trace.push(Step::Note(
            "value is NaN; quiet NaN pattern emitted".to_string(),
        ));
        return finish(value, EncodedFloat::nan(negative), trace);
    }
    if value.is_infinite() {
        trace.push(Step::Note(format!(
            "value is {}infinity",
            if negative { "-" } else { "+" }
        )));
        return finish(value, EncodedFloat::infinity(negative), trace);
    }

    trace.push(Step::Sign { negative });

    if value == 0.0 {
        trace.push(Step::Note(
            "exact zero; exponent and mantissa all zeros".to_string(),
        ));
        return finish(value, EncodedFloat::zero(negative), trace);
    }
    let abs = value.abs();
    if abs >= overflow_limit() {
        trace.push(Step::Note(
            "magnitude exceeds the single precision range; overflow to infinity".to_string(),
        ));
        return finish(value, EncodedFloat::infinity(negative), trace);
    }

    let dec = decompose(value);
    trace.push(Step::Split {
        int_part: dec.int_mag,
        frac_part: abs - abs.floor(),
    });
    let int_bits = dec.int_bits();
    trace.push(Step::IntegerBits {
        bits: if int_bits.is_empty() {
            "0".to_string()
        } else {
            bit_string(&int_bits)
        },
    });
    trace.push(Step::FractionBits {
        bits: bit_string(&dec.frac_bits),
        exact: dec.exact,
    });

    let norm = match normalize(&dec) {
        Some(norm) => norm,
        None => {
            debug!("no leading 1 within {} fraction bits", MAX_FRAC_BITS);
            trace.push(Step::Note(
                "no 1 bit within the expansion bound; value underflows to zero".to_string(),
            ));
            return finish(value, EncodedFloat::zero(negative), trace);
        }
    };
    trace.push(Step::Normalized {
        exponent: norm.exponent,
        mantissa: bit_string(&norm.mantissa_bits),
    });
    let biased = norm.exponent + EXP_BIAS;
    trace.push(Step::Bias {
        exponent: norm.exponent,
        biased,
    });
    if biased <= 0 {
        trace.push(Step::Note(
            "biased exponent <= 0; subnormal encoding without an implicit leading 1".to_string(),
        ));
    }

    let (encoded, rounding) = encode(&norm, negative);
    if let Some(r) = rounding {
        trace.push(Step::Round {
            guard: r.guard,
            sticky: r.sticky,
            rounded_up: r.rounded_up,
            carried: r.carried,
        });
    }
    match encoded.class {
        Class::Infinity => trace.push(Step::Note(
            "exponent overflow; encoded as infinity".to_string(),
        )),
        Class::Zero => trace.push(Step::Note("rounded down to zero".to_string())),
        _ => {}
    }
    finish(value, encoded, trace)
}

fn finish(value: f64, encoded: EncodedFloat, mut trace: Trace) -> Conversion {
    trace.push(Step::Fields {
        sign: encoded.negative as u8,
        exponent: encoded.exponent,
        mantissa: encoded.mantissa,
    });
    Conversion {
        value,
        encoded,
        trace,
    }
}
