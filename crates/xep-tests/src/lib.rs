//! Shared fixtures for the integration tests and benchmarks.
//!
//! The files under `tests/golden/` are hand-captured peer traffic: double
//! quotes, indentation and non-ASCII text included, so the decoder is
//! exercised on input it did not produce itself.
//!
//! | Fixture              | Contents                                          |
//! |----------------------|---------------------------------------------------|
//! | services             | TURN list with credentials, plus a TURNS entry    |
//! | credentials          | Credentials response for one TURN server          |
//! | slot_v0_2            | Slot with URLs as element text                    |
//! | slot_v0_3            | Slot with URL attributes and three headers        |
//! | request_v0_2         | Slot request with child elements                  |
//! | request_v0_3         | Slot request with attributes                      |
//! | file_too_large       | Upload refusal carrying a size limit              |
//! | retry                | Upload quota refusal with retry stamp             |
//! | occupant_id          | MUC occupant identifier                           |
//! | iq_file_too_large    | Error iq: request + not-acceptable + limit        |
//! | iq_retry             | Error iq: request + resource-constraint + retry   |
//! | session              | Client stream with four stanzas                   |

#![warn(clippy::pedantic)]

use std::path::{Path, PathBuf};

/// Names of the single-element fixtures, in table order.
pub const ELEMENT_FIXTURES: [&str; 9] = [
    "services",
    "credentials",
    "slot_v0_2",
    "slot_v0_3",
    "request_v0_2",
    "request_v0_3",
    "file_too_large",
    "retry",
    "occupant_id",
];

/// Path of `tests/golden/<name>.xml`.
pub fn golden_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden")
        .join(name)
        .with_extension("xml")
}

/// Read a golden fixture.
///
/// # Panics
///
/// Panics if the fixture does not exist; fixtures are committed with the
/// crate, so a missing one is a broken checkout.
pub fn golden(name: &str) -> String {
    let path = golden_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read golden fixture {}: {e}", path.display()))
}

/// A stream capture of `count` stanzas cycling through the element
/// families, wrapped in `<stream:stream>`.
pub fn synthetic_session(count: usize) -> String {
    const STANZAS: [&str; 4] = [
        "<iq type='result' id='d{n}'><services xmlns='urn:xmpp:extdisco:2'>\
           <service host='stun.example.com' type='stun' port='3478'/></services></iq>",
        "<message id='m{n}'><body>hi</body>\
           <occupant-id xmlns='urn:xmpp:occupant-id:0' id='occ{n}'/></message>",
        "<iq type='result' id='u{n}'><slot xmlns='urn:xmpp:http:upload:0'>\
           <put url='https://u.example.com/{n}'><header name='Authorization'>Bearer t</header></put>\
           <get url='https://d.example.com/{n}'/></slot></iq>",
        "<presence id='p{n}'/>",
    ];

    let mut capture = String::from(
        "<stream:stream xmlns='jabber:client' xmlns:stream='http://etherx.jabber.org/streams'>",
    );
    for n in 0..count {
        capture.push_str(&STANZAS[n % STANZAS.len()].replace("{n}", &n.to_string()));
    }
    capture.push_str("</stream:stream>");
    capture
}
