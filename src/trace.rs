use std::fmt;

/// Renders a bit slice as its 0/1 digits.
pub fn bit_string(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b == 1 { '1' } else { '0' }).collect()
}

/// One decision point of the conversion. The human narration lives in the
/// `Display` impl; the computation never prints.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Sign { negative: bool },
    Split { int_part: u128, frac_part: f64 },
    IntegerBits { bits: String },
    FractionBits { bits: String, exact: bool },
    Normalized { exponent: i32, mantissa: String },
    Bias { exponent: i32, biased: i32 },
    Round { guard: bool, sticky: bool, rounded_up: bool, carried: bool },
    Fields { sign: u8, exponent: u8, mantissa: u32 },
    Note(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Step::Sign { negative } => write!(
                f,
                "sign: value is {} -> sign bit {}",
                if *negative { "negative" } else { "positive" },
                *negative as u8
            ),
            Step::Split { int_part, frac_part } => write!(
                f,
                "split: integer part {}, fractional part {}",
                int_part, frac_part
            ),
            Step::IntegerBits { bits } => write!(f, "integer part in binary: {}", bits),
            Step::FractionBits { bits, exact } => {
                let shown = if bits.is_empty() { "0" } else { bits.as_str() };
                let tail = if *exact {
                    "terminated exactly"
                } else {
                    "truncated at the expansion bound"
                };
                write!(f, "fraction in binary: 0.{} ({})", shown, tail)
            }
            Step::Normalized { exponent, mantissa } => {
                write!(f, "normalized: 1.{} x 2^{}", mantissa, exponent)
            }
            Step::Bias { exponent, biased } => {
                write!(f, "biased exponent: {} + 127 = {}", exponent, biased)
            }
            Step::Round {
                guard,
                sticky,
                rounded_up,
                carried,
            } => {
                let outcome = match (*rounded_up, *carried) {
                    (false, _) => "mantissa kept",
                    (true, false) => "rounded up",
                    (true, true) => "rounded up with carry into the exponent",
                };
                write!(
                    f,
                    "round to nearest even: guard {}, sticky {} -> {}",
                    *guard as u8, *sticky as u8, outcome
                )
            }
            Step::Fields {
                sign,
                exponent,
                mantissa,
            } => write!(
                f,
                "fields: sign {}, exponent {:08b}, mantissa {:023b}",
                sign, exponent, mantissa
            ),
            Step::Note(note) => write!(f, "{}", note),
        }
    }
}

/// Append-only recorder for the steps of one conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub fn new() -> Trace {
        Trace { steps: vec![] }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
