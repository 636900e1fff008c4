use xep_types::{IqType, ProtocolElement, StanzaKind, ns};
use xep_wire::ElementNode;

use crate::condition::StanzaErrorCondition;
use crate::error::EncodeError;

/// Stanza encoder: wraps encoded protocol elements into an outbound
/// `iq` or `message`.
///
/// Methods like [`id`](Self::id), [`to`](Self::to) and
/// [`add`](Self::add) mutate the builder and return `&mut Self` so calls
/// chain; [`encode`](Self::encode) checks the stanza rules and renders
/// wire text.
///
/// ```text
///   StanzaEncoder::iq(IqType::Error)
///       .id("u1")
///       .error(StanzaErrorCondition::NotAcceptable)
///       .add(FileTooLarge { .. })
///
///   → <iq type='error' id='u1'>
///       <error type='modify'>
///         <not-acceptable xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/>
///         <file-too-large xmlns='urn:xmpp:http:upload:0'>…</file-too-large>
///       </error>
///     </iq>
/// ```
///
/// # Usage
///
/// ```rust
/// use xep_encoder::StanzaEncoder;
/// use xep_types::{ExternalServices, IqType};
///
/// let wire = StanzaEncoder::iq(IqType::Get)
///     .id("disco1")
///     .to("example.com")
///     .add(ExternalServices::request(Some("turn")))
///     .encode()
///     .unwrap();
/// assert_eq!(
///     wire,
///     "<iq type='get' id='disco1' to='example.com'>\
///      <services xmlns='urn:xmpp:extdisco:2' type='turn'/></iq>"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct StanzaEncoder {
    kind: StanzaKind,
    iq_type: Option<IqType>,
    id: Option<String>,
    from: Option<String>,
    to: Option<String>,
    condition: Option<StanzaErrorCondition>,
    payloads: Vec<ProtocolElement>,
}

impl StanzaEncoder {
    fn new(kind: StanzaKind, iq_type: Option<IqType>) -> Self {
        Self {
            kind,
            iq_type,
            id: None,
            from: None,
            to: None,
            condition: None,
            payloads: Vec::new(),
        }
    }

    pub fn iq(iq_type: IqType) -> Self {
        Self::new(StanzaKind::Iq, Some(iq_type))
    }

    pub fn message() -> Self {
        Self::new(StanzaKind::Message, None)
    }

    pub fn id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    pub fn from(&mut self, from: impl Into<String>) -> &mut Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(&mut self, to: impl Into<String>) -> &mut Self {
        self.to = Some(to.into());
        self
    }

    /// Append a payload element. Payloads keep the order they were added.
    pub fn add(&mut self, element: impl Into<ProtocolElement>) -> &mut Self {
        self.payloads.push(element.into());
        self
    }

    /// Mark this as an error response: payloads are emitted inside an
    /// `<error/>` child after the defined condition.
    pub fn error(&mut self, condition: StanzaErrorCondition) -> &mut Self {
        self.condition = Some(condition);
        self
    }

    /// Check the stanza rules and render wire text.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::MissingId`] for an iq without an id.
    /// - [`EncodeError::PayloadCount`] for a `get`/`set` iq without
    ///   exactly one payload.
    /// - [`EncodeError::UnexpectedErrorCondition`] if a condition is set
    ///   on anything but an `error` iq.
    /// - [`EncodeError::MissingErrorCondition`] for an `error` iq with no
    ///   condition.
    pub fn encode(&self) -> Result<String, EncodeError> {
        self.validate()?;
        Ok(self.to_node().to_wire())
    }

    fn validate(&self) -> Result<(), EncodeError> {
        let is_error_iq = self.iq_type == Some(IqType::Error);
        if self.condition.is_some() && !is_error_iq {
            return Err(EncodeError::UnexpectedErrorCondition { stanza: self.kind });
        }
        if let Some(iq_type) = self.iq_type {
            if self.id.is_none() {
                return Err(EncodeError::MissingId);
            }
            if iq_type.is_request() && self.payloads.len() != 1 {
                return Err(EncodeError::PayloadCount {
                    kind: iq_type,
                    count: self.payloads.len(),
                });
            }
            if is_error_iq && self.condition.is_none() {
                return Err(EncodeError::MissingErrorCondition);
            }
        }
        Ok(())
    }

    fn to_node(&self) -> ElementNode {
        let mut stanza = ElementNode::new(self.kind.as_wire())
            .with_opt_attr("type", self.iq_type.map(IqType::as_wire))
            .with_opt_attr("id", self.id.as_deref())
            .with_opt_attr("from", self.from.as_deref())
            .with_opt_attr("to", self.to.as_deref());

        let payloads = self.payloads.iter().map(ProtocolElement::to_node);
        match self.condition {
            Some(condition) => stanza.push_child(
                ElementNode::new("error")
                    .with_attr("type", condition.error_type().as_wire())
                    .with_child(ElementNode::namespaced(condition.as_wire(), ns::STANZAS))
                    .with_children(payloads),
            ),
            None => stanza = stanza.with_children(payloads),
        }
        stanza
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xep_decoder::ElementDecoder;
    use xep_types::{FileTooLarge, OccupantId, ProtocolVersion, RetryError, SlotRequest};

    #[test]
    fn get_requires_exactly_one_payload() {
        let err = StanzaEncoder::iq(IqType::Get).id("a").encode().unwrap_err();
        assert!(matches!(err, EncodeError::PayloadCount { kind: IqType::Get, count: 0 }));

        let err = StanzaEncoder::iq(IqType::Set)
            .id("a")
            .add(OccupantId::new("x"))
            .add(OccupantId::new("y"))
            .encode()
            .unwrap_err();
        assert!(matches!(err, EncodeError::PayloadCount { count: 2, .. }));
    }

    #[test]
    fn iq_requires_id() {
        let err = StanzaEncoder::iq(IqType::Result).encode().unwrap_err();
        assert!(matches!(err, EncodeError::MissingId));
    }

    #[test]
    fn result_may_be_empty() {
        let wire = StanzaEncoder::iq(IqType::Result).id("r").to("a@b/c").encode().unwrap();
        assert_eq!(wire, "<iq type='result' id='r' to='a@b/c'/>");
    }

    #[test]
    fn condition_only_on_error_iq() {
        let err = StanzaEncoder::iq(IqType::Result)
            .id("r")
            .error(StanzaErrorCondition::Forbidden)
            .encode()
            .unwrap_err();
        assert!(matches!(err, EncodeError::UnexpectedErrorCondition { stanza: StanzaKind::Iq }));

        let err = StanzaEncoder::message()
            .error(StanzaErrorCondition::Forbidden)
            .encode()
            .unwrap_err();
        assert!(matches!(err, EncodeError::UnexpectedErrorCondition { stanza: StanzaKind::Message }));

        let err = StanzaEncoder::iq(IqType::Error).id("e").encode().unwrap_err();
        assert!(matches!(err, EncodeError::MissingErrorCondition));
    }

    #[test]
    fn error_wraps_payloads() {
        let wire = StanzaEncoder::iq(IqType::Error)
            .id("u1")
            .error(StanzaErrorCondition::NotAcceptable)
            .add(FileTooLarge {
                version: ProtocolVersion::V0_3Plus,
                max_file_size: Some(20000),
            })
            .encode()
            .unwrap();
        assert_eq!(
            wire,
            "<iq type='error' id='u1'><error type='modify'>\
             <not-acceptable xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/>\
             <file-too-large xmlns='urn:xmpp:http:upload:0'><max-file-size>20000</max-file-size></file-too-large>\
             </error></iq>"
        );
    }

    #[test]
    fn message_without_type() {
        let wire = StanzaEncoder::message()
            .from("room@muc/nick")
            .add(OccupantId::new("abc"))
            .encode()
            .unwrap();
        assert_eq!(
            wire,
            "<message from='room@muc/nick'><occupant-id xmlns='urn:xmpp:occupant-id:0' id='abc'/></message>"
        );
    }

    #[test]
    fn decoder_reads_back_encoded_stanza() {
        let wire = StanzaEncoder::iq(IqType::Error)
            .id("q")
            .error(StanzaErrorCondition::ResourceConstraint)
            .add(RetryError::new("2030-01-01T00:00:00Z"))
            .encode()
            .unwrap();
        let stanza = ElementDecoder::decode_stanza(&wire).unwrap();
        assert_eq!(stanza.id.as_deref(), Some("q"));
        assert_eq!(stanza.error_type.as_deref(), Some("wait"));
        assert_eq!(stanza.error_condition.as_deref(), Some("resource-constraint"));
        assert_eq!(
            stanza.elements,
            vec![ProtocolElement::from(RetryError::new("2030-01-01T00:00:00Z"))]
        );

        let request = SlotRequest::new(ProtocolVersion::V0_2, "a.txt", 3);
        let wire = StanzaEncoder::iq(IqType::Get).id("g").add(request.clone()).encode().unwrap();
        assert_eq!(
            ElementDecoder::decode_stanza(&wire).unwrap().payload(),
            Some(&ProtocolElement::from(request))
        );
    }
}
