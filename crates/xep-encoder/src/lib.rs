#![warn(clippy::pedantic)]

pub mod condition;
pub mod encoder;
pub mod error;

pub use condition::{ErrorType, StanzaErrorCondition};
pub use encoder::StanzaEncoder;
pub use error::EncodeError;
