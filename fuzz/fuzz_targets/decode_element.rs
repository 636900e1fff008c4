#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: single-element decoder entry point.
//
// Calls `ElementDecoder::decode` on arbitrary UTF-8 input.
// Catches bugs in:
// - Root location and trailing data detection
// - Namespace dispatch across the element families
// - Version-specific slot and request grammars
// - Attribute parsing (integers, booleans, enums)
// - Truncation handling at every nesting level
fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = xep_decoder::ElementDecoder::decode(input);
    }
});
