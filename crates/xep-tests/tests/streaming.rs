//! The streaming decoder over whole captured sessions.

use tokio::io::AsyncWriteExt;
use xep_decoder::{DecodedStanza, DecoderConfig, ReadError, StreamingDecoder};
use xep_types::{OccupantId, ProtocolElement, StanzaKind};
use xep_tests::{golden, synthetic_session};

async fn collect(capture: &[u8], config: DecoderConfig) -> Vec<Result<DecodedStanza, ReadError>> {
    let mut decoder = StreamingDecoder::with_config(capture, config);
    let mut items = Vec::new();
    while let Some(item) = decoder.next().await {
        items.push(item);
    }
    items
}

#[tokio::test]
async fn session_capture() {
    let capture = golden("session");
    let stanzas: Vec<_> = collect(capture.as_bytes(), DecoderConfig::default())
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    let kinds: Vec<_> = stanzas.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![StanzaKind::Iq, StanzaKind::Message, StanzaKind::Iq, StanzaKind::Presence]
    );
    assert_eq!(
        stanzas[1].elements,
        vec![ProtocolElement::from(OccupantId::new(
            "dd72603deec90a38ba552f7c68cbcc61bca202cd"
        ))]
    );
    assert_eq!(stanzas[1].unknown, vec!["body".to_owned()]);
    assert!(matches!(stanzas[2].payload(), Some(ProtocolElement::Slot(_))));
    assert!(stanzas[3].elements.is_empty());
}

#[tokio::test]
async fn long_session_in_small_buffer() {
    // Each stanza fits the limit even though the whole capture does not.
    let capture = synthetic_session(400);
    let config = DecoderConfig::default().with_max_input_len(1024);
    assert!(capture.len() > 1024 * 10);

    let items = collect(capture.as_bytes(), config).await;
    assert_eq!(items.len(), 400);
    assert!(items.iter().all(Result::is_ok));
}

#[tokio::test]
async fn bad_stanza_does_not_end_the_stream() {
    let capture = "<stream:stream xmlns='jabber:client' xmlns:stream='http://etherx.jabber.org/streams'>\
                   <iq type='result' id='a'><services xmlns='urn:xmpp:extdisco:2'><service type='stun'/></services></iq>\
                   <presence/>\
                   </stream:stream>";
    let items = collect(capture.as_bytes(), DecoderConfig::default()).await;
    assert_eq!(items.len(), 2);
    assert!(items[0].is_err());
    assert_eq!(items[1].as_ref().unwrap().kind, StanzaKind::Presence);
}

#[tokio::test]
async fn connection_dropped_mid_stanza() {
    let (mut client, server) = tokio::io::duplex(64);
    let writer = tokio::spawn(async move {
        client
            .write_all(b"<presence/><message id='m'><occupant-id xmlns='urn:xmpp:occ")
            .await
            .unwrap();
        // Dropping the client closes the pipe.
    });

    let mut decoder = StreamingDecoder::new(server);
    assert_eq!(decoder.next().await.unwrap().unwrap().kind, StanzaKind::Presence);
    let err = decoder.next().await.unwrap().unwrap_err();
    assert!(err.is_truncated(), "{err:?}");
    assert!(decoder.next().await.is_none());
    writer.await.unwrap();
}
