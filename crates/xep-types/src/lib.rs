#![warn(clippy::pedantic)]

pub mod credentials;
pub mod element;
pub mod enums;
pub mod error;
pub mod extdisco;
pub mod file_too_large;
mod grammar;
pub mod ns;
pub mod occupant_id;
pub mod request;
pub mod retry;
pub mod slot;
pub mod version;

pub use credentials::{CredentialService, ServiceCredentials};
pub use element::{ElementKind, ProtocolElement};
pub use enums::{Action, IqType, StanzaKind};
pub use error::DecodeError;
pub use extdisco::{ExternalServices, Service};
pub use file_too_large::FileTooLarge;
pub use occupant_id::OccupantId;
pub use request::SlotRequest;
pub use retry::RetryError;
pub use slot::SlotResponse;
pub use version::ProtocolVersion;
