#![no_main]
use libfuzzer_sys::fuzz_target;
use littlexml::parser::{load, BufferSource, ParseOptions};

fuzz_target!(|data: &[u8]| {
    // Any input, at any chunk size, must parse without panicking.
    let _ = littlexml::parser::parse_bytes(data);
    let tiny = ParseOptions::default().chunk_size(1).max_depth(16);
    let mut doc = load(BufferSource::new(data), &tiny);
    doc.destroy();
});
