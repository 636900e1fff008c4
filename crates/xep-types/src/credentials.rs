use serde::{Deserialize, Serialize};
use tracing::trace;
use xep_wire::attrs::{optional_integer, optional_string, required_string};
use xep_wire::engine::skip_element;
use xep_wire::{ElementNode, EventCursor, EventSource, walk_children};

use crate::error::DecodeError;
use crate::grammar::enter_element;
use crate::ns;

/// `<credentials xmlns='urn:xmpp:extdisco:2'/>` — short-term credentials
/// for a restricted external service.
///
/// The request names the service by `host` and `type`; the response
/// repeats them and adds `username`/`password` (and optionally `port`).
/// The wire shape allows several `<service/>` children even though a
/// request normally asks about one.
///
/// ```text
/// <credentials xmlns='urn:xmpp:extdisco:2'>
///   <service host='turn.example.com' type='turn' port='3478'
///            username='u' password='p'/>
/// </credentials>
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCredentials {
    #[serde(default)]
    pub services: Vec<CredentialService>,
}

/// One `<service/>` inside `<credentials/>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialService {
    pub host: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ServiceCredentials {
    pub const ELEMENT: &'static str = "credentials";

    /// A credentials request for a single service.
    pub fn request(host: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            services: vec![CredentialService::new(host, service_type)],
        }
    }

    /// Decode a `<credentials/>` element.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MissingRequiredAttribute`] for a `<service/>`
    /// without `host` or `type`, [`DecodeError::InvalidFieldFormat`] for a
    /// bad `port`, plus the namespace and truncation failures every
    /// grammar reports.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        enter_element(cursor, Self::ELEMENT, ns::EXTDISCO)?;

        let mut services = Vec::new();
        walk_children(cursor, |cursor, child| -> Result<(), DecodeError> {
            if child == CredentialService::ELEMENT && cursor.namespace() == Some(ns::EXTDISCO) {
                services.push(CredentialService::decode(cursor)?);
            } else {
                trace!(parent = Self::ELEMENT, child, "skipping unknown child");
            }
            Ok(())
        })?;

        Ok(Self { services })
    }

    pub fn to_node(&self) -> ElementNode {
        ElementNode::namespaced(Self::ELEMENT, ns::EXTDISCO)
            .with_children(self.services.iter().map(CredentialService::to_node))
    }

    pub fn encode(&self) -> String {
        self.to_node().to_wire()
    }
}

impl CredentialService {
    pub const ELEMENT: &'static str = "service";

    pub fn new(host: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            service_type: service_type.into(),
            port: None,
            username: None,
            password: None,
        }
    }

    /// Decode one `<service/>`; the cursor is left on its end tag.
    ///
    /// # Errors
    ///
    /// See [`ServiceCredentials::decode`].
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        cursor.enter(Self::ELEMENT)?;
        let service = Self {
            host: required_string(cursor, "host")?,
            service_type: required_string(cursor, "type")?,
            port: optional_integer(cursor, "port")?,
            username: optional_string(cursor, "username"),
            password: optional_string(cursor, "password"),
        };
        skip_element(cursor)?;
        Ok(service)
    }

    pub fn to_node(&self) -> ElementNode {
        ElementNode::new(Self::ELEMENT)
            .with_attr("host", &self.host)
            .with_attr("type", &self.service_type)
            .with_opt_attr("port", self.port)
            .with_opt_attr("username", self.username.as_deref())
            .with_opt_attr("password", self.password.as_deref())
    }
}
