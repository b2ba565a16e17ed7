extern crate env_logger;

use ieee754_single::convert::{convert_str, Conversion};
use std::io::{self, Write};
use std::process;

fn main() {
    env_logger::init();

    let input = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            print!("Enter a number (integer or floating, positive or negative): ");
            io::stdout().flush().unwrap();
            let mut line = String::new();
            io::stdin().read_line(&mut line).unwrap_or(0);
            line
        }
    };

    match convert_str(&input) {
        Ok(conv) => report(&conv),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn report(conv: &Conversion) {
    println!("input value: {}", conv.value);
    println!("---- step by step IEEE 754 single precision conversion ----");
    for (i, step) in conv.trace.steps().iter().enumerate() {
        println!("{:2}) {}", i + 1, step);
    }

    let enc = &conv.encoded;
    println!();
    println!("final 32 bit representation: {}", enc.field_string());
    println!("hex: {:#010X}", enc.to_bits());
    println!("bytes: {:02X?}", enc.to_bytes().as_ref());
    println!("class: {:?}", enc.class);

    println!();
    println!(
        "native f32 bits: {:032b} ({:#010X})",
        conv.native_bits(),
        conv.native_bits()
    );
    if conv.matches_native() {
        println!("matches the platform encoding");
    } else {
        // double to single rounding already happened in the parsed input
        println!("differs from the platform encoding");
    }
}
