#![no_main]

use libfuzzer_sys::fuzz_target;
use xep_decoder::{Frame, extract_stanza};

// Fuzz target: stanza framing over raw bytes.
//
// Repeatedly frames the buffer the way the streaming decoder does. Every
// frame must consume at least one byte and stay within the buffer.
fuzz_target!(|data: &[u8]| {
    let mut rest = data;
    while let Ok(Some((frame, consumed))) = extract_stanza(rest) {
        assert!(consumed > 0, "frame consumed nothing");
        assert!(consumed <= rest.len(), "frame overran the buffer");
        if let Frame::Stanza(text) = frame {
            let _ = xep_decoder::ElementDecoder::decode_stanza(text);
        }
        rest = &rest[consumed..];
    }
});
