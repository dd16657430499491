//! Parse fuzz target: feed arbitrary bytes to the document parser.
//! The parser must not panic; it returns Ok(Protocol) or Err(ParseError),
//! and anything it accepts must also serialize.
//! Build with: cargo fuzz run parse_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(protocol) = wireidl::parse(s) {
        let _ = wireidl::serialize(&protocol);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parse_fuzz");
}
