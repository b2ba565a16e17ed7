//! Step by step IEEE 754 single precision (32 bit) encoding of decimal
//! values: sign split, binary expansion, normalization, biasing and round
//! to nearest even, with an ordered trace of every decision.

extern crate bytes;
extern crate log;

pub mod convert;
pub mod decompose;
pub mod encode;
pub mod normalize;
pub mod trace;

pub use convert::{convert, convert_str, Conversion, ConvertError};
pub use encode::{Class, EncodedFloat};

#[cfg(test)]
mod test {
    use crate::convert_str;

    #[test]
    fn encode_matches_platform() {
        let conv = convert_str("-1234.5678").unwrap();
        assert_eq!(conv.encoded.to_bits(), (-1234.5678f64 as f32).to_bits());
        assert!(conv.matches_native());
    }
}
