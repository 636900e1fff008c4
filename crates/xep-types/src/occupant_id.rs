use serde::{Deserialize, Serialize};
use xep_wire::attrs::required_string;
use xep_wire::engine::skip_element;
use xep_wire::{ElementNode, EventCursor, EventSource};

use crate::error::DecodeError;
use crate::grammar::enter_element;
use crate::ns;

/// `<occupant-id xmlns='urn:xmpp:occupant-id:0' id='…'/>`: a room's
/// stable, opaque identifier for one occupant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupantId {
    pub id: String,
}

impl OccupantId {
    pub const ELEMENT: &'static str = "occupant-id";

    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// # Errors
    ///
    /// [`DecodeError::MissingRequiredAttribute`] without `id`.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        enter_element(cursor, Self::ELEMENT, ns::OCCUPANT_ID)?;
        let id = required_string(cursor, "id")?;
        skip_element(cursor)?;
        Ok(Self { id })
    }

    pub fn to_node(&self) -> ElementNode {
        ElementNode::namespaced(Self::ELEMENT, ns::OCCUPANT_ID).with_attr("id", &self.id)
    }

    pub fn encode(&self) -> String {
        self.to_node().to_wire()
    }
}
