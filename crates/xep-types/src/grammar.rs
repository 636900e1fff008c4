//! Entry checks shared by the element grammars.

use xep_wire::{EventCursor, EventSource};

use crate::error::DecodeError;
use crate::version::ProtocolVersion;

/// Position on `<name xmlns='namespace'>`, failing if the cursor sits on
/// another element or the namespace differs or is absent.
pub(crate) fn enter_element<S: EventSource>(
    cursor: &mut EventCursor<S>,
    name: &'static str,
    namespace: &str,
) -> Result<(), DecodeError> {
    let tag = cursor.enter(name)?;
    match tag.namespace.as_deref() {
        Some(found) if found == namespace => Ok(()),
        Some(found) => Err(DecodeError::UnknownNamespace {
            namespace: found.to_owned(),
        }),
        None => Err(DecodeError::MissingNamespace { element: name }),
    }
}

/// Position on `<name>` in one of the upload namespaces and resolve its
/// protocol version.
pub(crate) fn enter_versioned<S: EventSource>(
    cursor: &mut EventCursor<S>,
    name: &'static str,
) -> Result<ProtocolVersion, DecodeError> {
    let tag = cursor.enter(name)?;
    match tag.namespace.as_deref() {
        Some(namespace) => ProtocolVersion::resolve(namespace),
        None => Err(DecodeError::MissingNamespace { element: name }),
    }
}
