use serde::Serialize;
use tracing::{debug, trace};
use xep_types::{DecodeError, ElementKind, ProtocolElement, StanzaKind, ns};
use xep_wire::attrs::optional_string;
use xep_wire::{EventCursor, EventSource, walk_children};

const ERROR: &str = "error";

/// A stanza with every recognised protocol element pulled out of it.
///
/// ```text
/// <iq id='u1' type='error' from='upload.example.com'>
///   <request xmlns='urn:xmpp:http:upload:0' filename='a' size='9'/>  → elements[0]
///   <error type='modify'>
///     <not-acceptable xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/>  → error_condition
///     <file-too-large xmlns='urn:xmpp:http:upload:0'/>               → elements[1]
///   </error>
///   <query xmlns='jabber:iq:version'/>                              → unknown
/// </iq>
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecodedStanza {
    pub kind: StanzaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub stanza_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Protocol elements among the direct children and inside `<error/>`,
    /// in document order.
    pub elements: Vec<ProtocolElement>,
    /// The `type` attribute of the stanza's `<error/>` child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Local name of the defined condition inside `<error/>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_condition: Option<String>,
    /// Names of direct children that belong to no registered family.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,
}

impl DecodedStanza {
    fn new(kind: StanzaKind) -> Self {
        Self {
            kind,
            id: None,
            stanza_type: None,
            from: None,
            to: None,
            elements: Vec::new(),
            error_type: None,
            error_condition: None,
            unknown: Vec::new(),
        }
    }

    /// The first decoded element, if any.
    pub fn payload(&self) -> Option<&ProtocolElement> {
        self.elements.first()
    }

    pub fn is_error(&self) -> bool {
        self.stanza_type.as_deref() == Some(ERROR)
    }

    /// Decode the stanza that starts at the cursor.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnexpectedElement`] if the element is not `iq`,
    ///   `message` or `presence`.
    /// - Any error a recognised child element's grammar reports.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        let tag = cursor.seek_start()?;
        let Ok(kind) = StanzaKind::from_wire(&tag.name) else {
            return Err(DecodeError::UnexpectedElement {
                expected: "iq, message or presence",
                found: tag.name.clone(),
            });
        };

        let mut stanza = Self::new(kind);
        stanza.id = optional_string(cursor, "id");
        stanza.stanza_type = optional_string(cursor, "type");
        stanza.from = optional_string(cursor, "from");
        stanza.to = optional_string(cursor, "to");

        walk_children(cursor, |cursor, child| -> Result<(), DecodeError> {
            if ElementKind::identify(cursor.namespace(), child).is_some() {
                stanza.elements.push(ProtocolElement::decode(cursor)?);
            } else if child == ERROR && is_client_namespace(cursor.namespace()) {
                stanza.decode_error(cursor)?;
            } else {
                trace!(stanza = %kind, child, "unrecognised child");
                stanza.unknown.push(child.to_owned());
            }
            Ok(())
        })?;

        debug!(
            stanza = %kind,
            id = stanza.id.as_deref().unwrap_or_default(),
            elements = stanza.elements.len(),
            "decoded stanza"
        );
        Ok(stanza)
    }

    fn decode_error<S: EventSource>(&mut self, cursor: &mut EventCursor<S>) -> Result<(), DecodeError> {
        self.error_type = optional_string(cursor, "type");
        walk_children(cursor, |cursor, child| -> Result<(), DecodeError> {
            let namespace = cursor.namespace();
            if namespace == Some(ns::STANZAS) {
                if child != "text" {
                    self.error_condition = Some(child.to_owned());
                }
            } else if ElementKind::identify(namespace, child).is_some() {
                self.elements.push(ProtocolElement::decode(cursor)?);
            } else {
                trace!(child, "unrecognised error child");
            }
            Ok(())
        })
    }
}

/// Stanza children inherit `jabber:client`, or nothing at all when a
/// stanza is captured outside its stream.
fn is_client_namespace(namespace: Option<&str>) -> bool {
    matches!(namespace, None | Some(ns::JABBER_CLIENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xep_types::{OccupantId, RetryError};
    use xep_wire::XmlSource;

    fn decode(xml: &str) -> Result<DecodedStanza, DecodeError> {
        DecodedStanza::decode(&mut EventCursor::new(XmlSource::new(xml)))
    }

    #[test]
    fn attributes_and_payload() {
        let stanza = decode(
            "<message xmlns='jabber:client' id='m1' type='groupchat' from='room@muc/nick' to='me@host'>\
               <body>hi</body>\
               <occupant-id xmlns='urn:xmpp:occupant-id:0' id='abc'/>\
             </message>",
        )
        .unwrap();
        assert_eq!(stanza.kind, StanzaKind::Message);
        assert_eq!(stanza.id.as_deref(), Some("m1"));
        assert_eq!(stanza.stanza_type.as_deref(), Some("groupchat"));
        assert_eq!(stanza.from.as_deref(), Some("room@muc/nick"));
        assert_eq!(stanza.to.as_deref(), Some("me@host"));
        assert_eq!(stanza.elements, vec![ProtocolElement::from(OccupantId::new("abc"))]);
        assert_eq!(stanza.unknown, vec!["body".to_owned()]);
    }

    #[test]
    fn error_condition_and_application_element() {
        let stanza = decode(
            "<iq id='u1' type='error'>\
               <request xmlns='urn:xmpp:http:upload:0' filename='a' size='9'/>\
               <error type='wait'>\
                 <resource-constraint xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/>\
                 <text xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'>Quota reached</text>\
                 <retry xmlns='urn:xmpp:http:upload:0' stamp='2024-01-01T00:00:00Z'/>\
               </error>\
             </iq>",
        )
        .unwrap();
        assert!(stanza.is_error());
        assert_eq!(stanza.error_type.as_deref(), Some("wait"));
        assert_eq!(stanza.error_condition.as_deref(), Some("resource-constraint"));
        assert_eq!(stanza.elements.len(), 2);
        assert_eq!(
            stanza.elements[1],
            ProtocolElement::from(RetryError::new("2024-01-01T00:00:00Z"))
        );
        assert!(stanza.unknown.is_empty());
    }

    #[test]
    fn not_a_stanza() {
        let err = decode("<slot xmlns='urn:xmpp:http:upload'/>").unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedElement { ref found, .. } if found == "slot"));
    }

    #[test]
    fn bad_payload_fails_stanza() {
        let err = decode(
            "<iq type='result' id='x'><services xmlns='urn:xmpp:extdisco:2'><service type='stun'/></services></iq>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredAttribute { field: "host" }));
    }

    #[test]
    fn empty_presence() {
        let stanza = decode("<presence/>").unwrap();
        assert_eq!(stanza.kind, StanzaKind::Presence);
        assert!(stanza.payload().is_none());
    }
}
