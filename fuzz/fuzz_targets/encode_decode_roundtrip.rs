#![no_main]

use std::collections::BTreeMap;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use xep_decoder::ElementDecoder;
use xep_types::{
    Action, CredentialService, ExternalServices, FileTooLarge, OccupantId, ProtocolElement,
    ProtocolVersion, RetryError, Service, ServiceCredentials, SlotRequest, SlotResponse,
};

/// Characters the tokens are drawn from, markup-significant ones and
/// spaces included. Whitespace-only text is dropped on decode, so every
/// token carries at least one visible character.
const ALPHABET: &[u8] = b"abcXYZ019-_.:/?=&<>'\"% ";

#[derive(Debug, Arbitrary)]
struct Token(Vec<u8>);

impl Token {
    fn text(&self) -> String {
        let mut text: String = self
            .0
            .iter()
            .take(24)
            .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
            .collect();
        if text.trim().is_empty() {
            text.push('x');
        }
        text
    }
}

#[derive(Debug, Arbitrary)]
enum FuzzElement {
    Services {
        filter: Option<Token>,
        services: Vec<(Token, Token, Option<u16>, Option<bool>, Option<u8>, Option<Token>)>,
    },
    Credentials {
        services: Vec<(Token, Token, Option<u16>, Option<Token>)>,
    },
    SlotV0_2 {
        put: Token,
        get: Token,
    },
    SlotV0_3 {
        put: Token,
        get: Token,
        headers: Vec<(Token, Token)>,
    },
    Request {
        v0_2: bool,
        filename: Token,
        size: u64,
        content_type: Option<Token>,
    },
    FileTooLarge {
        v0_2: bool,
        max_file_size: Option<u64>,
    },
    Retry {
        stamp: Token,
    },
    OccupantId {
        id: Token,
    },
}

fn version(v0_2: bool) -> ProtocolVersion {
    if v0_2 {
        ProtocolVersion::V0_2
    } else {
        ProtocolVersion::V0_3Plus
    }
}

fn action_from_id(id: u8) -> Action {
    match id % 3 {
        0 => Action::Add,
        1 => Action::Remove,
        _ => Action::Modify,
    }
}

fn build(input: FuzzElement) -> ProtocolElement {
    match input {
        FuzzElement::Services { filter, services } => ExternalServices {
            service_type: filter.map(|t| t.text()),
            services: services
                .iter()
                .take(16)
                .map(|(host, kind, port, restricted, action, expires)| {
                    let mut service = Service::new(host.text(), kind.text());
                    service.port = *port;
                    service.restricted = *restricted;
                    service.action = action.map(action_from_id);
                    service.expires = expires.as_ref().map(Token::text);
                    service
                })
                .collect(),
        }
        .into(),
        FuzzElement::Credentials { services } => ServiceCredentials {
            services: services
                .iter()
                .take(16)
                .map(|(host, kind, port, username)| {
                    let mut service = CredentialService::new(host.text(), kind.text());
                    service.port = *port;
                    service.username = username.as_ref().map(Token::text);
                    service
                })
                .collect(),
        }
        .into(),
        FuzzElement::SlotV0_2 { put, get } => SlotResponse::V0_2 {
            put_url: put.text(),
            get_url: get.text(),
        }
        .into(),
        FuzzElement::SlotV0_3 { put, get, headers } => SlotResponse::V0_3Plus {
            put_url: put.text(),
            get_url: get.text(),
            headers: headers
                .iter()
                .take(8)
                .map(|(name, value)| (name.text(), value.text()))
                .collect::<BTreeMap<_, _>>(),
        }
        .into(),
        FuzzElement::Request {
            v0_2,
            filename,
            size,
            content_type,
        } => {
            let request = SlotRequest::new(version(v0_2), filename.text(), size);
            match content_type {
                Some(content_type) => request.with_content_type(content_type.text()),
                None => request,
            }
            .into()
        }
        FuzzElement::FileTooLarge { v0_2, max_file_size } => FileTooLarge {
            version: version(v0_2),
            max_file_size,
        }
        .into(),
        FuzzElement::Retry { stamp } => RetryError::new(stamp.text()).into(),
        FuzzElement::OccupantId { id } => OccupantId::new(id.text()).into(),
    }
}

// Fuzz target: element value -> wire text -> element value.
//
// Anything the grammars encode must decode back to an equal value.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzElement::arbitrary(&mut u) else {
        return;
    };

    let element = build(input);
    let wire = element.encode();
    let decoded = ElementDecoder::decode(&wire);
    assert!(decoded.is_ok(), "decoder failed on encoder output {wire}: {:?}", decoded.err());
    assert_eq!(decoded.unwrap(), element, "roundtrip changed {wire}");
});
