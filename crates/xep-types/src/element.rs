use serde::{Deserialize, Serialize};
use xep_wire::{ElementNode, EventCursor, EventSource};

use crate::credentials::ServiceCredentials;
use crate::error::DecodeError;
use crate::extdisco::ExternalServices;
use crate::file_too_large::FileTooLarge;
use crate::ns;
use crate::occupant_id::OccupantId;
use crate::request::SlotRequest;
use crate::retry::RetryError;
use crate::slot::SlotResponse;

/// Which protocol family an element belongs to.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────┬────────────────┐
/// │ Kind             │ Namespace(s)                             │ Element        │
/// ├──────────────────┼──────────────────────────────────────────┼────────────────┤
/// │ ExternalServices │ urn:xmpp:extdisco:2                      │ services       │
/// │ Credentials      │ urn:xmpp:extdisco:2                      │ credentials    │
/// │ Slot             │ urn:xmpp:http:upload, …:upload:0         │ slot           │
/// │ SlotRequest      │ urn:xmpp:http:upload, …:upload:0         │ request        │
/// │ FileTooLarge     │ urn:xmpp:http:upload, …:upload:0         │ file-too-large │
/// │ Retry            │ urn:xmpp:http:upload:0                   │ retry          │
/// │ OccupantId       │ urn:xmpp:occupant-id:0                   │ occupant-id    │
/// └──────────────────┴──────────────────────────────────────────┴────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    ExternalServices,
    Credentials,
    Slot,
    SlotRequest,
    FileTooLarge,
    Retry,
    OccupantId,
}

impl ElementKind {
    /// Look up the family registered for `(namespace, name)`.
    pub fn identify(namespace: Option<&str>, name: &str) -> Option<Self> {
        let namespace = namespace?;
        let upload = namespace == ns::HTTP_UPLOAD_V0_2 || namespace == ns::HTTP_UPLOAD_V0_3;
        match name {
            ExternalServices::ELEMENT if namespace == ns::EXTDISCO => Some(Self::ExternalServices),
            ServiceCredentials::ELEMENT if namespace == ns::EXTDISCO => Some(Self::Credentials),
            SlotResponse::ELEMENT if upload => Some(Self::Slot),
            SlotRequest::ELEMENT if upload => Some(Self::SlotRequest),
            FileTooLarge::ELEMENT if upload => Some(Self::FileTooLarge),
            RetryError::ELEMENT if namespace == ns::HTTP_UPLOAD_V0_3 => Some(Self::Retry),
            OccupantId::ELEMENT if namespace == ns::OCCUPANT_ID => Some(Self::OccupantId),
            _ => None,
        }
    }
}

/// Any element this crate can decode or encode.
///
/// JSON form is internally tagged by `element`, e.g.
/// `{"element":"retry","stamp":"2024-01-01T00:00:00Z"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "kebab-case")]
pub enum ProtocolElement {
    #[serde(rename = "services")]
    ExternalServices(ExternalServices),
    Credentials(ServiceCredentials),
    Slot(SlotResponse),
    #[serde(rename = "request")]
    SlotRequest(SlotRequest),
    FileTooLarge(FileTooLarge),
    Retry(RetryError),
    OccupantId(OccupantId),
}

impl ProtocolElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::ExternalServices(_) => ElementKind::ExternalServices,
            Self::Credentials(_) => ElementKind::Credentials,
            Self::Slot(_) => ElementKind::Slot,
            Self::SlotRequest(_) => ElementKind::SlotRequest,
            Self::FileTooLarge(_) => ElementKind::FileTooLarge,
            Self::Retry(_) => ElementKind::Retry,
            Self::OccupantId(_) => ElementKind::OccupantId,
        }
    }

    /// Decode whichever registered element starts at the cursor.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnsupportedElement`] if no family is registered for
    /// the element's name and namespace, otherwise whatever the family's
    /// grammar reports.
    pub fn decode<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<Self, DecodeError> {
        let tag = cursor.seek_start()?;
        let Some(kind) = ElementKind::identify(tag.namespace.as_deref(), &tag.name) else {
            return Err(DecodeError::UnsupportedElement {
                namespace: tag.namespace.clone(),
                name: tag.name.clone(),
            });
        };

        Ok(match kind {
            ElementKind::ExternalServices => Self::ExternalServices(ExternalServices::decode(cursor)?),
            ElementKind::Credentials => Self::Credentials(ServiceCredentials::decode(cursor)?),
            ElementKind::Slot => Self::Slot(SlotResponse::decode(cursor)?),
            ElementKind::SlotRequest => Self::SlotRequest(SlotRequest::decode(cursor)?),
            ElementKind::FileTooLarge => Self::FileTooLarge(FileTooLarge::decode(cursor)?),
            ElementKind::Retry => Self::Retry(RetryError::decode(cursor)?),
            ElementKind::OccupantId => Self::OccupantId(OccupantId::decode(cursor)?),
        })
    }

    pub fn to_node(&self) -> ElementNode {
        match self {
            Self::ExternalServices(value) => value.to_node(),
            Self::Credentials(value) => value.to_node(),
            Self::Slot(value) => value.to_node(),
            Self::SlotRequest(value) => value.to_node(),
            Self::FileTooLarge(value) => value.to_node(),
            Self::Retry(value) => value.to_node(),
            Self::OccupantId(value) => value.to_node(),
        }
    }

    pub fn encode(&self) -> String {
        self.to_node().to_wire()
    }
}

// ── Conversions ───────────────────────────────────────────────────────

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for ProtocolElement {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from! {
    ExternalServices(ExternalServices),
    Credentials(ServiceCredentials),
    Slot(SlotResponse),
    SlotRequest(SlotRequest),
    FileTooLarge(FileTooLarge),
    Retry(RetryError),
    OccupantId(OccupantId),
}
