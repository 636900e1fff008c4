//! Namespaces that are part of the wire contract.

/// External service discovery, version 2.
pub const EXTDISCO: &str = "urn:xmpp:extdisco:2";

/// HTTP file upload, v0.2 wire generation.
pub const HTTP_UPLOAD_V0_2: &str = "urn:xmpp:http:upload";

/// HTTP file upload, v0.3 and later.
pub const HTTP_UPLOAD_V0_3: &str = "urn:xmpp:http:upload:0";

/// Anonymous occupant identifiers for MUC.
pub const OCCUPANT_ID: &str = "urn:xmpp:occupant-id:0";

/// Stanza error conditions.
pub const STANZAS: &str = "urn:ietf:params:xml:ns:xmpp-stanzas";

/// Client stream namespace, the default for stanzas on a client connection.
pub const JABBER_CLIENT: &str = "jabber:client";
