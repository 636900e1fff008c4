use xep_types::DecodeError;
use xep_wire::WireError;

/// Errors from the decoder entry points.
///
/// ```text
///   ReadError
///   ├── InputTooLarge      ← input or buffered stanza over max_input_len
///   ├── NoElement          ← input held no element at all
///   ├── TrailingData       ← another element followed the decoded one
///   ├── InvalidUtf8        ← a framed stanza was not UTF-8
///   ├── Decode(DecodeError) ← from the element grammars
///   └── Io(std::io::Error) ← from the streaming reader
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("input of {size} bytes exceeds limit of {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("input contains no element")]
    NoElement,

    /// The input held more than the single element that was asked for.
    #[error("unexpected element <{found}> after the decoded element")]
    TrailingData { found: String },

    #[error("stanza is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<WireError> for ReadError {
    fn from(err: WireError) -> Self {
        Self::Decode(err.into())
    }
}

impl From<quick_xml::Error> for ReadError {
    fn from(err: quick_xml::Error) -> Self {
        WireError::from(err).into()
    }
}

impl ReadError {
    /// Whether the input ended before a complete element was read.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Decode(DecodeError::TruncatedInput))
    }
}
