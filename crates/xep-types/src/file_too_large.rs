use serde::{Deserialize, Serialize};
use tracing::trace;
use xep_wire::attrs::parse_integer;
use xep_wire::{ElementNode, EventCursor, EventSource, walk_children};

use crate::error::DecodeError;
use crate::grammar::enter_versioned;
use crate::version::ProtocolVersion;

const MAX_FILE_SIZE: &str = "max-file-size";

/// `<file-too-large/>` — application condition of an upload refusal,
/// optionally telling the client the largest size it would accept.
///
/// ```text
/// <file-too-large xmlns='urn:xmpp:http:upload:0'>
///   <max-file-size>20000</max-file-size>
/// </file-too-large>
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTooLarge {
    pub version: ProtocolVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
}

impl FileTooLarge {
    pub const ELEMENT: &'static str = "file-too-large";

    /// Decode a `<file-too-large/>` element in either upload namespace.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidFieldFormat`] if `max-file-size` is not an
    /// integer, [`DecodeError::MalformedNestedElement`] if it has children.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        let version = enter_versioned(cursor, Self::ELEMENT)?;

        let mut max_file_size = None;
        walk_children(cursor, |cursor, child| -> Result<(), DecodeError> {
            if child == MAX_FILE_SIZE {
                max_file_size = Some(parse_integer::<u64>(MAX_FILE_SIZE, &cursor.text_content()?)?);
            } else {
                trace!(parent = Self::ELEMENT, child, "skipping unknown child");
            }
            Ok(())
        })?;

        Ok(Self {
            version,
            max_file_size,
        })
    }

    pub fn to_node(&self) -> ElementNode {
        let node = ElementNode::namespaced(Self::ELEMENT, self.version.namespace());
        match self.max_file_size {
            Some(limit) => node.with_child(ElementNode::new(MAX_FILE_SIZE).with_text(limit.to_string())),
            None => node,
        }
    }

    pub fn encode(&self) -> String {
        self.to_node().to_wire()
    }
}
