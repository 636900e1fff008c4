#![warn(clippy::pedantic)]

pub mod attrs;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod event;
pub mod source;
pub mod writer;

pub use cursor::EventCursor;
pub use engine::{Content, walk_children, walk_content};
pub use error::WireError;
pub use event::{StartTag, XmlEvent};
pub use source::{EventSource, ReplaySource, XmlSource, is_truncation};
pub use writer::{ElementNode, Node};
