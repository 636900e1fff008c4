//! Edge cases: hostile, truncated, foreign and mis-shaped input.
//!
//! Every case must end in a typed error (or a documented lenient result),
//! never a panic.

use xep_decoder::{DecoderConfig, ElementDecoder, ReadError};
use xep_tests::golden;
use xep_types::{DecodeError, ExternalServices, ProtocolElement, Service};
use xep_wire::WireError;

fn decode_err(input: &str) -> ReadError {
    match ElementDecoder::decode(input) {
        Ok(element) => panic!("expected failure, decoded {element:?}"),
        Err(e) => e,
    }
}

// ── Truncation ────────────────────────────────────────────────────────────────

#[test]
fn every_prefix_of_a_fixture_is_truncated_or_empty() {
    let input = golden("slot_v0_3");
    let body = input.trim_end();
    for cut in 1..body.len() {
        if !body.is_char_boundary(cut) {
            continue;
        }
        let err = decode_err(&body[..cut]);
        assert!(
            err.is_truncated() || matches!(err, ReadError::NoElement),
            "prefix of {cut} bytes gave {err:?}"
        );
    }
}

#[test]
fn unclosed_stanza_is_truncated() {
    let err = ElementDecoder::decode_stanza("<iq type='result' id='a'><slot xmlns='urn:xmpp:http:upload'>")
        .unwrap_err();
    assert!(err.is_truncated(), "{err:?}");
}

// ── Required attributes ───────────────────────────────────────────────────────

#[test]
fn service_without_host() {
    let err = decode_err("<services xmlns='urn:xmpp:extdisco:2'><service type='stun'/></services>");
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::MissingRequiredAttribute { field: "host" })
    ));
}

#[test]
fn slot_without_get() {
    let err = decode_err("<slot xmlns='urn:xmpp:http:upload:0'><put url='https://u/p'/></slot>");
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::MissingRequiredAttribute { field: "get" })
    ));
}

#[test]
fn retry_without_stamp() {
    let err = decode_err("<retry xmlns='urn:xmpp:http:upload:0'/>");
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::MissingRequiredAttribute { field: "stamp" })
    ));
}

// ── Field formats ─────────────────────────────────────────────────────────────

#[test]
fn port_out_of_range() {
    let err = decode_err(
        "<services xmlns='urn:xmpp:extdisco:2'><service host='h' type='turn' port='70000'/></services>",
    );
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::InvalidFieldFormat { field: "port", .. })
    ));
}

#[test]
fn negative_request_size() {
    let err = decode_err("<request xmlns='urn:xmpp:http:upload:0' filename='a' size='-1'/>");
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::InvalidFieldFormat { field: "size", .. })
    ));
}

#[test]
fn unknown_action_is_rejected() {
    let err = decode_err(
        "<services xmlns='urn:xmpp:extdisco:2'><service host='h' type='turn' action='delete'/></services>",
    );
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::InvalidEnumValue { field: "action", ref value }) if value == "delete"
    ));
}

#[test]
fn expires_is_kept_verbatim() {
    let element = ElementDecoder::decode(
        "<services xmlns='urn:xmpp:extdisco:2'><service host='h' type='turn' expires='soon'/></services>",
    )
    .unwrap();
    let mut expected = Service::new("h", "turn");
    expected.expires = Some("soon".into());
    assert_eq!(
        element,
        ProtocolElement::from(ExternalServices {
            service_type: None,
            services: vec![expected],
        })
    );
}

// ── Namespaces and generations ────────────────────────────────────────────────

#[test]
fn future_upload_namespace_is_unsupported() {
    let err = decode_err("<slot xmlns='urn:xmpp:http:upload:1'><put url='p'/><get url='g'/></slot>");
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::UnsupportedElement { ref name, .. }) if name == "slot"
    ));
}

#[test]
fn retry_does_not_exist_in_v0_2() {
    let err = decode_err("<retry xmlns='urn:xmpp:http:upload' stamp='s'/>");
    assert!(matches!(err, ReadError::Decode(DecodeError::UnsupportedElement { .. })));
}

#[test]
fn v0_3_slot_shape_under_v0_2_namespace() {
    let err = decode_err("<slot xmlns='urn:xmpp:http:upload'><put url='p'/><get url='g'/></slot>");
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::MalformedNestedElement { .. })
    ));
}

#[test]
fn v0_2_slot_shape_under_v0_3_namespace() {
    let err = decode_err("<slot xmlns='urn:xmpp:http:upload:0'><put>p</put><get>g</get></slot>");
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::MalformedNestedElement { .. })
    ));
}

#[test]
fn unknown_children_are_skipped() {
    let element = ElementDecoder::decode(
        "<services xmlns='urn:xmpp:extdisco:2'>\
           <x xmlns='jabber:x:data'><field var='a'><value>1</value></field></x>\
           <service host='h' type='stun'/>\
         </services>",
    )
    .unwrap();
    assert_eq!(
        element,
        ProtocolElement::from(ExternalServices {
            service_type: None,
            services: vec![Service::new("h", "stun")],
        })
    );
}

// ── Resource limits ───────────────────────────────────────────────────────────

#[test]
fn depth_limit() {
    let config = DecoderConfig::default().with_max_depth(2);
    let err = ElementDecoder::decode_with_config(&golden("slot_v0_3"), &config).unwrap_err();
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::Wire(WireError::DepthLimitExceeded { limit: 2 }))
    ));
    // The same fixture without headers fits.
    assert!(ElementDecoder::decode_with_config(&golden("slot_v0_2"), &config).is_ok());
}

#[test]
fn input_too_large() {
    let input = golden("occupant_id");
    let config = DecoderConfig::default().with_max_input_len(16);
    let err = ElementDecoder::decode_with_config(&input, &config).unwrap_err();
    assert!(matches!(err, ReadError::InputTooLarge { limit: 16, .. }));
}

// ── Framing of whole inputs ───────────────────────────────────────────────────

#[test]
fn trailing_element() {
    let input = format!("{}{}", golden("retry"), golden("occupant_id"));
    assert!(matches!(
        decode_err(&input),
        ReadError::TrailingData { ref found } if found == "occupant-id"
    ));
}

#[test]
fn blank_input() {
    assert!(matches!(decode_err("  \n\t"), ReadError::NoElement));
}

#[test]
fn not_xml() {
    let err = decode_err("<slot xmlns='urn:xmpp:http:upload:0' put=>");
    assert!(!err.is_truncated(), "{err:?}");
}

#[test]
fn stanza_decoder_rejects_bare_elements() {
    let err = ElementDecoder::decode_stanza(&golden("retry")).unwrap_err();
    assert!(matches!(
        err,
        ReadError::Decode(DecodeError::UnexpectedElement { ref found, .. }) if found == "retry"
    ));
}
