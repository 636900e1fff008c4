use xep_wire::cursor::DEFAULT_MAX_DEPTH;
use xep_wire::{EventCursor, XmlSource};

use crate::error::ReadError;

/// Largest input (or buffered stanza) accepted by default: 1 MiB.
pub const DEFAULT_MAX_INPUT_LEN: usize = 1024 * 1024;

/// Resource limits applied by every decoder entry point.
///
/// ```text
/// ┌───────────────┬─────────┬───────────────────────────────────────────┐
/// │ Field         │ Default │ Enforced by                               │
/// ├───────────────┼─────────┼───────────────────────────────────────────┤
/// │ max_depth     │ 32      │ EventCursor (DepthLimitExceeded)          │
/// │ max_input_len │ 1 MiB   │ ElementDecoder, StreamingDecoder buffer   │
/// └───────────────┴─────────┴───────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    pub max_depth: u32,
    pub max_input_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }
}

impl DecoderConfig {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }

    /// Reject inputs longer than `max_input_len`.
    ///
    /// # Errors
    ///
    /// [`ReadError::InputTooLarge`] if `len` exceeds the limit.
    pub fn check_len(&self, len: usize) -> Result<(), ReadError> {
        if len > self.max_input_len {
            return Err(ReadError::InputTooLarge {
                size: len,
                limit: self.max_input_len,
            });
        }
        Ok(())
    }

    /// A cursor over `input` with this configuration's depth limit.
    pub(crate) fn cursor<'a>(&self, input: &'a str) -> EventCursor<XmlSource<'a>> {
        EventCursor::with_max_depth(XmlSource::new(input), self.max_depth)
    }
}
