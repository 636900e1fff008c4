use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::ns;

/// Wire generation of the HTTP upload protocol, selected by namespace.
///
/// ```text
/// ┌──────────────────────────┬──────────┬──────────────────────────────┐
/// │ Namespace                │ Version  │ Slot shape                   │
/// ├──────────────────────────┼──────────┼──────────────────────────────┤
/// │ urn:xmpp:http:upload     │ V0_2     │ <put>url</put><get>url</get> │
/// │ urn:xmpp:http:upload:0   │ V0_3Plus │ <put url=…/><get url=…/>     │
/// └──────────────────────────┴──────────┴──────────────────────────────┘
/// ```
///
/// Grammars match on this exhaustively, without a wildcard arm, so adding
/// a generation here fails to compile until every grammar handles it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    #[serde(rename = "0.2")]
    V0_2,
    #[serde(rename = "0.3+")]
    V0_3Plus,
}

impl ProtocolVersion {
    /// Map a namespace to the version it denotes.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnknownNamespace`] for any namespace that is not
    /// registered, including later upload namespaces such as
    /// `urn:xmpp:http:upload:1`.
    pub fn resolve(namespace: &str) -> Result<Self, DecodeError> {
        match namespace {
            ns::HTTP_UPLOAD_V0_2 => Ok(Self::V0_2),
            ns::HTTP_UPLOAD_V0_3 => Ok(Self::V0_3Plus),
            other => Err(DecodeError::UnknownNamespace {
                namespace: other.to_owned(),
            }),
        }
    }

    /// The namespace this version is spelled with on the wire.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::V0_2 => ns::HTTP_UPLOAD_V0_2,
            Self::V0_3Plus => ns::HTTP_UPLOAD_V0_3,
        }
    }
}
