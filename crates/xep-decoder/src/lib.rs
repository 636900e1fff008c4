#![warn(clippy::pedantic)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod stanza;
pub mod streaming;

pub use config::DecoderConfig;
pub use decoder::ElementDecoder;
pub use error::ReadError;
pub use frame::{Frame, extract_stanza};
pub use stanza::DecodedStanza;
pub use streaming::StreamingDecoder;
