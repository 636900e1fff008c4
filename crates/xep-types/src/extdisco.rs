use serde::{Deserialize, Serialize};
use tracing::trace;
use xep_wire::attrs::{optional_boolean, optional_integer, optional_string, required_string};
use xep_wire::engine::skip_element;
use xep_wire::{ElementNode, EventCursor, EventSource, walk_children};

use crate::enums::Action;
use crate::error::DecodeError;
use crate::grammar::enter_element;
use crate::ns;

/// `<services xmlns='urn:xmpp:extdisco:2'/>` — a list of external services
/// (STUN/TURN relays and the like), or a request for one.
///
/// ```text
/// <services xmlns='urn:xmpp:extdisco:2' type='turn'>      ← type: optional filter echo
///   <service host='turn.example.com' type='turn'
///            port='3478' transport='udp'
///            username='u' password='p'
///            restricted='1' expires='2024-01-01T00:00:00Z'/>
///   <service host='stun.example.com' type='stun'/>      ← document order kept
/// </services>
/// ```
///
/// A request is the same element with no children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalServices {
    /// The `type` filter of the request this list answers, if any.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub services: Vec<Service>,
}

/// One `<service/>` entry.
///
/// `expires` is kept as the raw attribute text. Whether it is a valid
/// timestamp is a property of the peer being tested, not of the codec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub host: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

impl ExternalServices {
    pub const ELEMENT: &'static str = "services";

    /// A request for all services, or only those of `service_type`.
    pub fn request(service_type: Option<&str>) -> Self {
        Self {
            service_type: service_type.map(str::to_owned),
            services: Vec::new(),
        }
    }

    /// Decode a `<services/>` element.
    ///
    /// Children other than `<service/>` are skipped.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] raised by a `<service/>` child, plus
    /// [`DecodeError::UnknownNamespace`] if the root is not in
    /// `urn:xmpp:extdisco:2` and [`DecodeError::TruncatedInput`] if the
    /// element is never closed.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        enter_element(cursor, Self::ELEMENT, ns::EXTDISCO)?;
        let service_type = optional_string(cursor, "type");

        let mut services = Vec::new();
        walk_children(cursor, |cursor, child| -> Result<(), DecodeError> {
            match child {
                Service::ELEMENT if cursor.namespace() == Some(ns::EXTDISCO) => {
                    services.push(Service::decode(cursor)?);
                }
                other => trace!(parent = Self::ELEMENT, child = other, "skipping unknown child"),
            }
            Ok(())
        })?;

        Ok(Self {
            service_type,
            services,
        })
    }

    pub fn to_node(&self) -> ElementNode {
        ElementNode::namespaced(Self::ELEMENT, ns::EXTDISCO)
            .with_opt_attr("type", self.service_type.as_deref())
            .with_children(self.services.iter().map(Service::to_node))
    }

    pub fn encode(&self) -> String {
        self.to_node().to_wire()
    }
}

impl Service {
    pub const ELEMENT: &'static str = "service";

    /// A service with only the required attributes set.
    pub fn new(host: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            service_type: service_type.into(),
            port: None,
            transport: None,
            name: None,
            username: None,
            password: None,
            restricted: None,
            action: None,
            expires: None,
        }
    }

    /// Decode one `<service/>`; the cursor must be on (or before) its
    /// start tag and is left on its end tag.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MissingRequiredAttribute`] for `host` or `type`.
    /// - [`DecodeError::InvalidFieldFormat`] for a non-numeric `port` or a
    ///   `restricted` that is not an `xs:boolean`.
    /// - [`DecodeError::InvalidEnumValue`] for an unknown `action`.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        cursor.enter(Self::ELEMENT)?;

        let service = Self {
            host: required_string(cursor, "host")?,
            service_type: required_string(cursor, "type")?,
            port: optional_integer(cursor, "port")?,
            transport: optional_string(cursor, "transport"),
            name: optional_string(cursor, "name"),
            username: optional_string(cursor, "username"),
            password: optional_string(cursor, "password"),
            restricted: optional_boolean(cursor, "restricted")?,
            action: cursor.attribute("action").map(Action::from_wire).transpose()?,
            expires: optional_string(cursor, "expires"),
        };

        skip_element(cursor)?;
        Ok(service)
    }

    pub fn to_node(&self) -> ElementNode {
        ElementNode::new(Self::ELEMENT)
            .with_attr("host", &self.host)
            .with_attr("type", &self.service_type)
            .with_opt_attr("port", self.port)
            .with_opt_attr("transport", self.transport.as_deref())
            .with_opt_attr("name", self.name.as_deref())
            .with_opt_attr("username", self.username.as_deref())
            .with_opt_attr("password", self.password.as_deref())
            .with_opt_attr("restricted", self.restricted)
            .with_opt_attr("action", self.action.map(Action::as_wire))
            .with_opt_attr("expires", self.expires.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xep_wire::{XmlEvent, XmlSource};

    fn decode(xml: &str) -> Result<ExternalServices, DecodeError> {
        ExternalServices::decode(&mut EventCursor::new(XmlSource::new(xml)))
    }

    #[test]
    fn two_services_in_document_order() {
        let list = decode(
            "<services xmlns='urn:xmpp:extdisco:2'>\
               <service host='a' type='stun'/><service host='b' type='turn'/>\
             </services>",
        )
        .unwrap();
        assert_eq!(list.service_type, None);
        assert_eq!(list.services, vec![Service::new("a", "stun"), Service::new("b", "turn")]);
    }

    #[test]
    fn foreign_service_child_is_skipped() {
        let list = decode(
            "<services xmlns='urn:xmpp:extdisco:2'>\
               <service xmlns='urn:example:other' host='x' type='y'/>\
               <o:service xmlns:o='urn:example:other' host='z' type='stun'/>\
               <service host='a' type='stun'/>\
             </services>",
        )
        .unwrap();
        assert_eq!(list.services, vec![Service::new("a", "stun")]);
    }

    #[test]
    fn all_attributes_captured() {
        let list = decode(
            "<services xmlns='urn:xmpp:extdisco:2' type='turn'>\
               <service host='turn.example.com' type='turn' port='3478' transport='udp' \
                 name='Relay' username='u' password='p' restricted='1' action='add' \
                 expires='2024-13-45T99:00:00Z'/>\
             </services>",
        )
        .unwrap();
        assert_eq!(list.service_type.as_deref(), Some("turn"));
        let service = &list.services[0];
        assert_eq!(service.port, Some(3478));
        assert_eq!(service.transport.as_deref(), Some("udp"));
        assert_eq!(service.name.as_deref(), Some("Relay"));
        assert_eq!(service.username.as_deref(), Some("u"));
        assert_eq!(service.password.as_deref(), Some("p"));
        assert_eq!(service.restricted, Some(true));
        assert_eq!(service.action, Some(Action::Add));
        // Not a valid timestamp, kept verbatim.
        assert_eq!(service.expires.as_deref(), Some("2024-13-45T99:00:00Z"));
    }

    #[test]
    fn missing_host_is_hard_failure() {
        let err = decode(
            "<services xmlns='urn:xmpp:extdisco:2'><service type='stun' port='3478'/></services>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredAttribute { field: "host" }));
    }

    #[test]
    fn non_numeric_port_rejected() {
        let err = decode(
            "<services xmlns='urn:xmpp:extdisco:2'><service host='a' type='stun' port='x'/></services>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFieldFormat { field: "port", .. }));
    }

    #[test]
    fn unknown_action_rejected() {
        let err = decode(
            "<services xmlns='urn:xmpp:extdisco:2'><service host='a' type='stun' action='delete'/></services>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidEnumValue { field: "action", .. }));
    }

    #[test]
    fn unknown_children_skipped() {
        let list = decode(
            "<services xmlns='urn:xmpp:extdisco:2'>\
               <x xmlns='urn:example'><service host='nested' type='stun'/></x>\
               <service host='a' type='stun'><extra/></service>\
             </services>",
        )
        .unwrap();
        assert_eq!(list.services, vec![Service::new("a", "stun")]);
    }

    #[test]
    fn wrong_namespace_rejected() {
        let err = decode("<services xmlns='urn:xmpp:extdisco:1'/>").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownNamespace { .. }));
    }

    #[test]
    fn unterminated_list_is_truncated() {
        let err = decode("<services xmlns='urn:xmpp:extdisco:2'><service host='a' type='stun'/>")
            .unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedInput));
    }

    #[test]
    fn cursor_left_after_element() {
        let mut cursor = EventCursor::new(XmlSource::new(
            "<services xmlns='urn:xmpp:extdisco:2'/><next/>",
        ));
        ExternalServices::decode(&mut cursor).unwrap();
        assert!(matches!(cursor.next_event().unwrap(), XmlEvent::StartElement(tag) if tag.name == "next"));
    }

    #[test]
    fn encode_request_and_list() {
        assert_eq!(
            ExternalServices::request(Some("turn")).encode(),
            "<services xmlns='urn:xmpp:extdisco:2' type='turn'/>"
        );
        let list = ExternalServices {
            service_type: None,
            services: vec![Service {
                port: Some(3478),
                restricted: Some(false),
                action: Some(Action::Remove),
                ..Service::new("a", "stun")
            }],
        };
        assert_eq!(
            list.encode(),
            "<services xmlns='urn:xmpp:extdisco:2'>\
             <service host='a' type='stun' port='3478' restricted='false' action='remove'/>\
             </services>"
        );
    }

    #[test]
    fn decode_of_encode_is_identity() {
        let list = ExternalServices {
            service_type: Some("turn".into()),
            services: vec![
                Service {
                    port: Some(5349),
                    transport: Some("tcp".into()),
                    username: Some("alice".into()),
                    password: Some("s3cr&t".into()),
                    expires: Some("2030-01-01T00:00:00Z".into()),
                    ..Service::new("turn.example.com", "turns")
                },
                Service::new("stun.example.com", "stun"),
            ],
        };
        assert_eq!(decode(&list.encode()).unwrap(), list);
    }
}
