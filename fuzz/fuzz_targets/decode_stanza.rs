#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: stanza decoder.
//
// Exercises the `<error/>` child handling and payload dispatch on top of
// everything `decode_element` covers.
fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = xep_decoder::ElementDecoder::decode_stanza(input);
    }
});
