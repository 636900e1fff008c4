use serde::{Deserialize, Serialize};
use xep_wire::attrs::required_string;
use xep_wire::engine::skip_element;
use xep_wire::{ElementNode, EventCursor, EventSource};

use crate::error::DecodeError;
use crate::grammar::enter_element;
use crate::ns;

/// `<retry xmlns='urn:xmpp:http:upload:0' stamp='…'/>` — the upload
/// quota resets at `stamp`.
///
/// The stamp is kept as raw text; callers that need a time parse it
/// themselves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryError {
    pub stamp: String,
}

impl RetryError {
    pub const ELEMENT: &'static str = "retry";

    pub fn new(stamp: impl Into<String>) -> Self {
        Self {
            stamp: stamp.into(),
        }
    }

    /// Decode a `<retry/>` element. Children are skipped.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MissingRequiredAttribute`] without `stamp`,
    /// [`DecodeError::TruncatedInput`] if the element is never closed.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        enter_element(cursor, Self::ELEMENT, ns::HTTP_UPLOAD_V0_3)?;
        let stamp = required_string(cursor, "stamp")?;
        skip_element(cursor)?;
        Ok(Self { stamp })
    }

    pub fn to_node(&self) -> ElementNode {
        ElementNode::namespaced(Self::ELEMENT, ns::HTTP_UPLOAD_V0_3).with_attr("stamp", &self.stamp)
    }

    pub fn encode(&self) -> String {
        self.to_node().to_wire()
    }
}
