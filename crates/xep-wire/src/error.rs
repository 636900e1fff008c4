/// Errors raised while pulling events off the wire or reading values
/// from the element the cursor is positioned on.
///
/// These are the cursor-level failures. Grammar crates fold the ones
/// that have a protocol meaning (missing attribute, truncation, bad
/// field format, unexpected child) into their own error type and keep
/// the rest wrapped.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The event stream ended before the element being decoded was closed.
    #[error("input ended before the element was closed")]
    TruncatedInput,

    /// A required attribute was not present on the current start element.
    #[error("missing required attribute: {field}")]
    MissingRequiredAttribute { field: &'static str },

    /// An attribute or text value was present but could not be parsed
    /// into the field's type.
    #[error("invalid value {value:?} for field {field}")]
    InvalidFieldFormat { field: &'static str, value: String },

    /// A child element appeared where only text content was allowed.
    #[error("expected {expected}, found element <{found}>")]
    UnexpectedChild { expected: &'static str, found: String },

    /// A grammar was entered on an element it does not decode.
    #[error("expected element <{expected}>, found <{found}>")]
    UnexpectedElement { expected: &'static str, found: String },

    /// Element nesting went deeper than the configured limit.
    #[error("element nesting exceeds depth limit {limit}")]
    DepthLimitExceeded { limit: u32 },

    /// The underlying XML reader rejected the input.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
}
