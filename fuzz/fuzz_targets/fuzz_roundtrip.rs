#![no_main]
use libfuzzer_sys::fuzz_target;
use littlexml::parser::parse_bytes;
use littlexml::serial::serialize;

fuzz_target!(|data: &[u8]| {
    // Parse -> serialize -> parse roundtrip should never panic
    let doc = parse_bytes(data);
    if doc.success() {
        let output = serialize(&doc);
        let _ = parse_bytes(output.as_bytes());
    }
});
