use std::collections::BTreeMap;

use criterion::{Criterion, criterion_group, criterion_main};
use xep_encoder::{StanzaEncoder, StanzaErrorCondition};
use xep_types::{
    ExternalServices, FileTooLarge, IqType, ProtocolVersion, Service, SlotRequest, SlotResponse,
};

fn bench_encode_request_iq(c: &mut Criterion) {
    let request = SlotRequest::new(ProtocolVersion::V0_3Plus, "très cool.jpg", 23_456)
        .with_content_type("image/jpeg");

    c.bench_function("encode_request_iq", |b| {
        b.iter(|| {
            StanzaEncoder::iq(IqType::Get)
                .id("step_01")
                .to("upload.montague.tld")
                .add(request.clone())
                .encode()
                .unwrap()
        });
    });
}

fn bench_encode_slot(c: &mut Criterion) {
    let slot = SlotResponse::V0_3Plus {
        put_url: "https://upload.montague.tld/4a771ac1/a.jpg?sig=x&exp=1".into(),
        get_url: "https://download.montague.tld/4a771ac1/a.jpg".into(),
        headers: BTreeMap::from([
            ("Authorization".to_owned(), "Basic Base64String==".to_owned()),
            ("Cookie".to_owned(), "foo=bar; user=romeo".to_owned()),
        ]),
    };

    c.bench_function("encode_slot_v0_3", |b| b.iter(|| slot.encode()));
}

fn bench_encode_services(c: &mut Criterion) {
    let services = ExternalServices {
        service_type: None,
        services: (0..100)
            .map(|n| {
                let mut service = Service::new(format!("turn{n}.example.com"), "turn");
                service.port = Some(3478);
                service.restricted = Some(true);
                service
            })
            .collect(),
    };

    c.bench_function("encode_services_100", |b| b.iter(|| services.encode()));
}

fn bench_encode_error_iq(c: &mut Criterion) {
    let limit = FileTooLarge {
        version: ProtocolVersion::V0_3Plus,
        max_file_size: Some(20_000),
    };

    c.bench_function("encode_error_iq", |b| {
        b.iter(|| {
            StanzaEncoder::iq(IqType::Error)
                .id("step_03")
                .error(StanzaErrorCondition::NotAcceptable)
                .add(limit)
                .encode()
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_encode_request_iq,
    bench_encode_slot,
    bench_encode_services,
    bench_encode_error_iq
);
criterion_main!(benches);
