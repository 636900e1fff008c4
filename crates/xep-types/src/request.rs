use serde::{Deserialize, Serialize};
use tracing::trace;
use xep_wire::attrs::{optional_string, parse_integer, required_integer, required_string};
use xep_wire::{ElementNode, EventCursor, EventSource, walk_children};

use crate::error::DecodeError;
use crate::grammar::enter_versioned;
use crate::version::ProtocolVersion;

const FILENAME: &str = "filename";
const SIZE: &str = "size";
const CONTENT_TYPE: &str = "content-type";

/// `<request/>` — ask the upload service for a slot.
///
/// v0.2 carries the file description as child elements, v0.3+ as
/// attributes:
///
/// ```text
///   <request xmlns='urn:xmpp:http:upload'>
///     <filename>a.jpg</filename><size>23456</size>
///     <content-type>image/jpeg</content-type>
///   </request>
///
///   <request xmlns='urn:xmpp:http:upload:0'
///            filename='a.jpg' size='23456' content-type='image/jpeg'/>
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub version: ProtocolVersion,
    pub filename: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl SlotRequest {
    pub const ELEMENT: &'static str = "request";

    pub fn new(version: ProtocolVersion, filename: impl Into<String>, size: u64) -> Self {
        Self {
            version,
            filename: filename.into(),
            size,
            content_type: None,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Decode a `<request/>` in either upload namespace.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MissingRequiredAttribute`] without `filename` or
    /// `size`, [`DecodeError::InvalidFieldFormat`] for a size that is not
    /// a non-negative integer, [`DecodeError::UnknownNamespace`] and
    /// [`DecodeError::TruncatedInput`] as for every grammar.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        let version = enter_versioned(cursor, Self::ELEMENT)?;
        match version {
            ProtocolVersion::V0_2 => Self::decode_children(cursor),
            ProtocolVersion::V0_3Plus => Self::decode_attributes(cursor),
        }
    }

    fn decode_children<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        let mut filename = None;
        let mut size = None;
        let mut content_type = None;

        walk_children(cursor, |cursor, child| -> Result<(), DecodeError> {
            match child {
                FILENAME => filename = Some(cursor.text_content()?),
                SIZE => size = Some(parse_integer::<u64>(SIZE, &cursor.text_content()?)?),
                CONTENT_TYPE => content_type = Some(cursor.text_content()?),
                other => trace!(parent = Self::ELEMENT, child = other, "skipping unknown child"),
            }
            Ok(())
        })?;

        Ok(Self {
            version: ProtocolVersion::V0_2,
            filename: filename.ok_or(DecodeError::MissingRequiredAttribute { field: FILENAME })?,
            size: size.ok_or(DecodeError::MissingRequiredAttribute { field: SIZE })?,
            content_type,
        })
    }

    fn decode_attributes<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        let request = Self {
            version: ProtocolVersion::V0_3Plus,
            filename: required_string(cursor, FILENAME)?,
            size: required_integer(cursor, SIZE)?,
            content_type: optional_string(cursor, CONTENT_TYPE),
        };
        walk_children(cursor, |_, child| -> Result<(), DecodeError> {
            trace!(parent = Self::ELEMENT, child, "skipping unknown child");
            Ok(())
        })?;
        Ok(request)
    }

    pub fn to_node(&self) -> ElementNode {
        let request = ElementNode::namespaced(Self::ELEMENT, self.version.namespace());
        match self.version {
            ProtocolVersion::V0_2 => {
                let mut request = request
                    .with_child(ElementNode::new(FILENAME).with_text(&self.filename))
                    .with_child(ElementNode::new(SIZE).with_text(self.size.to_string()));
                if let Some(content_type) = &self.content_type {
                    request.push_child(ElementNode::new(CONTENT_TYPE).with_text(content_type));
                }
                request
            }
            ProtocolVersion::V0_3Plus => request
                .with_attr(FILENAME, &self.filename)
                .with_attr(SIZE, self.size.to_string())
                .with_opt_attr(CONTENT_TYPE, self.content_type.as_deref()),
        }
    }

    pub fn encode(&self) -> String {
        self.to_node().to_wire()
    }
}
