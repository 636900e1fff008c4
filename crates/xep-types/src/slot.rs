use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;
use xep_wire::attrs::{optional_string, required_string};
use xep_wire::{Content, ElementNode, EventCursor, EventSource, walk_children, walk_content};

use crate::error::DecodeError;
use crate::grammar::enter_versioned;
use crate::version::ProtocolVersion;

const PUT: &str = "put";
const GET: &str = "get";
const HEADER: &str = "header";

/// Headers a client may forward to the HTTP PUT request. Anything else
/// the server sends is kept in the decoded value but not permitted.
pub const PERMITTED_HEADERS: [&str; 3] = ["Authorization", "Cookie", "Expires"];

/// `<slot/>` — the upload/download URL pair granted for one file.
///
/// The two wire generations disagree on where the URLs live, so the value
/// is a closed union selected once from the element's namespace:
///
/// ```text
///   V0_2      <slot xmlns='urn:xmpp:http:upload'>
///               <put>https://u/p</put>
///               <get>https://u/g</get>
///             </slot>
///
///   V0_3Plus  <slot xmlns='urn:xmpp:http:upload:0'>
///               <put url='https://u/p'>
///                 <header name='Authorization'>Bearer xyz</header>
///               </put>
///               <get url='https://u/g'/>
///             </slot>
/// ```
///
/// Children shaped for the other generation are rejected, never guessed
/// at. Repeated header names keep the last value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum SlotResponse {
    #[serde(rename = "0.2")]
    V0_2 { put_url: String, get_url: String },
    #[serde(rename = "0.3+")]
    V0_3Plus {
        put_url: String,
        get_url: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
}

impl SlotResponse {
    pub const ELEMENT: &'static str = "slot";

    pub fn version(&self) -> ProtocolVersion {
        match self {
            Self::V0_2 { .. } => ProtocolVersion::V0_2,
            Self::V0_3Plus { .. } => ProtocolVersion::V0_3Plus,
        }
    }

    pub fn put_url(&self) -> &str {
        match self {
            Self::V0_2 { put_url, .. } | Self::V0_3Plus { put_url, .. } => put_url,
        }
    }

    pub fn get_url(&self) -> &str {
        match self {
            Self::V0_2 { get_url, .. } | Self::V0_3Plus { get_url, .. } => get_url,
        }
    }

    /// Every header the server attached to the PUT URL (none for v0.2).
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        let headers = match self {
            Self::V0_2 { .. } => None,
            Self::V0_3Plus { headers, .. } => Some(headers),
        };
        headers
            .into_iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// The headers a client may pass on to the HTTP PUT: names in
    /// [`PERMITTED_HEADERS`] (case-insensitive) whose values carry no line
    /// breaks.
    pub fn permitted_headers(&self) -> BTreeMap<&str, &str> {
        self.headers()
            .filter(|(name, value)| {
                PERMITTED_HEADERS.iter().any(|p| p.eq_ignore_ascii_case(name))
                    && !value.contains(['\r', '\n'])
            })
            .collect()
    }

    /// Decode a `<slot/>` element in either upload namespace.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnknownNamespace`] if the namespace is not an
    ///   upload namespace.
    /// - [`DecodeError::MalformedNestedElement`] if `put`/`get` have the
    ///   other generation's shape.
    /// - [`DecodeError::MissingRequiredAttribute`] for a missing `put`,
    ///   `get`, `url` or header `name`.
    /// - [`DecodeError::TruncatedInput`] if the element is never closed.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        match enter_versioned(cursor, Self::ELEMENT)? {
            ProtocolVersion::V0_2 => Self::decode_v0_2(cursor),
            ProtocolVersion::V0_3Plus => Self::decode_v0_3(cursor),
        }
    }

    fn decode_v0_2<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        let mut put_url = None;
        let mut get_url = None;

        walk_children(cursor, |cursor, child| -> Result<(), DecodeError> {
            match child {
                PUT => put_url = Some(url_text(cursor, PUT)?),
                GET => get_url = Some(url_text(cursor, GET)?),
                other => trace!(parent = Self::ELEMENT, child = other, "skipping unknown child"),
            }
            Ok(())
        })?;

        Ok(Self::V0_2 {
            put_url: put_url.ok_or(DecodeError::MissingRequiredAttribute { field: PUT })?,
            get_url: get_url.ok_or(DecodeError::MissingRequiredAttribute { field: GET })?,
        })
    }

    fn decode_v0_3<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        let mut put_url = None;
        let mut get_url = None;
        let mut headers = BTreeMap::new();

        walk_children(cursor, |cursor, child| -> Result<(), DecodeError> {
            match child {
                PUT => put_url = Some(url_attribute(cursor, PUT, Some(&mut headers))?),
                GET => get_url = Some(url_attribute(cursor, GET, None)?),
                other => trace!(parent = Self::ELEMENT, child = other, "skipping unknown child"),
            }
            Ok(())
        })?;

        Ok(Self::V0_3Plus {
            put_url: put_url.ok_or(DecodeError::MissingRequiredAttribute { field: PUT })?,
            get_url: get_url.ok_or(DecodeError::MissingRequiredAttribute { field: GET })?,
            headers,
        })
    }

    pub fn to_node(&self) -> ElementNode {
        let slot = ElementNode::namespaced(Self::ELEMENT, self.version().namespace());
        match self {
            Self::V0_2 { put_url, get_url } => slot
                .with_child(ElementNode::new(PUT).with_text(put_url))
                .with_child(ElementNode::new(GET).with_text(get_url)),
            Self::V0_3Plus {
                put_url,
                get_url,
                headers,
            } => slot
                .with_child(ElementNode::new(PUT).with_attr("url", put_url).with_children(
                    headers.iter().map(|(name, value)| {
                        ElementNode::new(HEADER).with_attr("name", name).with_text(value)
                    }),
                ))
                .with_child(ElementNode::new(GET).with_attr("url", get_url)),
        }
    }

    pub fn encode(&self) -> String {
        self.to_node().to_wire()
    }
}

/// v0.2 `put`/`get`: the URL is the element's text.
fn url_text<S: EventSource>(
    cursor: &mut EventCursor<S>,
    field: &'static str,
) -> Result<String, DecodeError> {
    if cursor.attribute("url").is_some() {
        return Err(DecodeError::MalformedNestedElement {
            expected: "URL as element text",
            found: format!("<{field}> with a url attribute"),
        });
    }
    let url = cursor.text_content()?;
    if url.is_empty() {
        return Err(DecodeError::MissingRequiredAttribute { field });
    }
    Ok(url)
}

/// v0.3+ `put`/`get`: the URL is the `url` attribute. `headers` collects
/// `<header/>` children where the generation allows them.
fn url_attribute<S: EventSource>(
    cursor: &mut EventCursor<S>,
    field: &'static str,
    mut headers: Option<&mut BTreeMap<String, String>>,
) -> Result<String, DecodeError> {
    let url = optional_string(cursor, "url");
    let mut text = String::new();

    walk_content(cursor, |cursor, content| -> Result<(), DecodeError> {
        match content {
            Content::Child(HEADER) => match headers.as_deref_mut() {
                Some(headers) => {
                    let name = required_string(cursor, "name")?;
                    let value = cursor.text_content()?;
                    headers.insert(name, value);
                }
                None => trace!(parent = field, child = HEADER, "skipping unknown child"),
            },
            Content::Child(other) => trace!(parent = field, child = other, "skipping unknown child"),
            Content::Text(chunk) => text.push_str(chunk),
        }
        Ok(())
    })?;

    match url {
        Some(url) => Ok(url),
        None if !text.is_empty() => Err(DecodeError::MalformedNestedElement {
            expected: "url attribute",
            found: format!("<{field}> with text content"),
        }),
        None => Err(DecodeError::MissingRequiredAttribute { field: "url" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xep_wire::XmlSource;

    fn decode(xml: &str) -> Result<SlotResponse, DecodeError> {
        SlotResponse::decode(&mut EventCursor::new(XmlSource::new(xml)))
    }

    #[test]
    fn v0_2_urls_from_text() {
        let slot = decode(
            "<slot xmlns='urn:xmpp:http:upload'><put>https://u/p</put><get>https://u/g</get></slot>",
        )
        .unwrap();
        assert_eq!(
            slot,
            SlotResponse::V0_2 {
                put_url: "https://u/p".into(),
                get_url: "https://u/g".into(),
            }
        );
        assert_eq!(slot.headers().count(), 0);
    }

    #[test]
    fn v0_3_urls_from_attributes_with_headers() {
        let slot = decode(
            "<slot xmlns='urn:xmpp:http:upload:0'>\
               <put url='https://u/p'><header name='Authorization'>Bearer xyz</header></put>\
               <get url='https://u/g'/>\
             </slot>",
        )
        .unwrap();
        assert_eq!(
            slot,
            SlotResponse::V0_3Plus {
                put_url: "https://u/p".into(),
                get_url: "https://u/g".into(),
                headers: BTreeMap::from([("Authorization".into(), "Bearer xyz".into())]),
            }
        );
        assert_eq!(slot.version(), ProtocolVersion::V0_3Plus);
    }

    #[test]
    fn repeated_header_last_write_wins() {
        let slot = decode(
            "<slot xmlns='urn:xmpp:http:upload:0'>\
               <put url='p'><header name='Cookie'>a=1</header><header name='Cookie'>a=2</header></put>\
               <get url='g'/>\
             </slot>",
        )
        .unwrap();
        assert_eq!(slot.headers().collect::<Vec<_>>(), vec![("Cookie", "a=2")]);
    }

    #[test]
    fn v0_2_children_under_v0_3_namespace_rejected() {
        let err = decode(
            "<slot xmlns='urn:xmpp:http:upload:0'><put>https://u/p</put><get>https://u/g</get></slot>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedNestedElement { .. }));
    }

    #[test]
    fn v0_3_children_under_v0_2_namespace_rejected() {
        let err = decode(
            "<slot xmlns='urn:xmpp:http:upload'><put url='https://u/p'/><get url='https://u/g'/></slot>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedNestedElement { .. }));
    }

    #[test]
    fn header_child_under_v0_2_rejected() {
        let err = decode(
            "<slot xmlns='urn:xmpp:http:upload'><put><header name='a'>b</header></put><get>g</get></slot>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedNestedElement { expected: "text content", ref found } if found == "header"
        ));
    }

    #[test]
    fn unknown_upload_namespace_rejected() {
        let err = decode("<slot xmlns='urn:xmpp:http:upload:1'><put url='p'/><get url='g'/></slot>")
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownNamespace { .. }));
    }

    #[test]
    fn missing_get_rejected() {
        let err = decode("<slot xmlns='urn:xmpp:http:upload:0'><put url='p'/></slot>").unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredAttribute { field: "get" }));
    }

    #[test]
    fn empty_put_without_url_is_missing_url() {
        let err = decode("<slot xmlns='urn:xmpp:http:upload:0'><put/><get url='g'/></slot>").unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredAttribute { field: "url" }));
    }

    #[test]
    fn header_without_name_rejected() {
        let err = decode(
            "<slot xmlns='urn:xmpp:http:upload:0'><put url='p'><header>v</header></put><get url='g'/></slot>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredAttribute { field: "name" }));
    }

    #[test]
    fn encode_v0_3_without_headers_self_closes_put() {
        let slot = SlotResponse::V0_3Plus {
            put_url: "https://u/p".into(),
            get_url: "https://u/g".into(),
            headers: BTreeMap::new(),
        };
        assert_eq!(
            slot.encode(),
            "<slot xmlns='urn:xmpp:http:upload:0'><put url='https://u/p'/><get url='https://u/g'/></slot>"
        );
    }

    #[test]
    fn encode_v0_2_inline_text() {
        let slot = SlotResponse::V0_2 {
            put_url: "https://u/p?a=1&b=2".into(),
            get_url: "https://u/g".into(),
        };
        assert_eq!(
            slot.encode(),
            "<slot xmlns='urn:xmpp:http:upload'><put>https://u/p?a=1&amp;b=2</put><get>https://u/g</get></slot>"
        );
        assert_eq!(decode(&slot.encode()).unwrap(), slot);
    }

    #[test]
    fn decode_of_encode_is_identity_with_headers() {
        let slot = SlotResponse::V0_3Plus {
            put_url: "https://u/p".into(),
            get_url: "https://u/g".into(),
            headers: BTreeMap::from([
                ("Authorization".into(), "Basic Zm9v".into()),
                ("Cookie".into(), "foo=bar; user=romeo".into()),
            ]),
        };
        assert_eq!(decode(&slot.encode()).unwrap(), slot);
    }

    #[test]
    fn permitted_headers_filter() {
        let slot = SlotResponse::V0_3Plus {
            put_url: "p".into(),
            get_url: "g".into(),
            headers: BTreeMap::from([
                ("authorization".into(), "Bearer t".into()),
                ("X-Evil".into(), "1".into()),
                ("Cookie".into(), "a\r\nHost: evil".into()),
                ("Expires".into(), "Wed, 21 Oct 2015 07:28:00 GMT".into()),
            ]),
        };
        let permitted = slot.permitted_headers();
        assert_eq!(
            permitted.into_iter().collect::<Vec<_>>(),
            vec![("Expires", "Wed, 21 Oct 2015 07:28:00 GMT"), ("authorization", "Bearer t")]
        );
    }
}
