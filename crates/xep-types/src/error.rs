use xep_wire::WireError;

/// Errors a grammar reports when an element cannot be decoded.
///
/// Every variant is terminal for the decode call that produced it: no
/// partial value is returned alongside it and nothing is retried. The
/// caller decides whether it points at a codec bug, malformed input, or
/// a peer that violated the protocol.
///
/// # Error hierarchy
///
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │ DecodeError (this crate)                                  │
/// │   ├── MissingRequiredAttribute  ← from WireError          │
/// │   ├── InvalidFieldFormat        ← from WireError          │
/// │   ├── TruncatedInput            ← from WireError          │
/// │   ├── MalformedNestedElement    ← WireError::UnexpectedChild│
/// │   │                               or a version mismatch   │
/// │   ├── UnexpectedElement         ← from WireError          │
/// │   ├── UnknownNamespace          ← version resolver         │
/// │   ├── MissingNamespace          ← element with no xmlns    │
/// │   ├── InvalidEnumValue          ← enum attribute lookup    │
/// │   ├── UnsupportedElement        ← generic dispatch         │
/// │   └── Wire(WireError)           ← XML syntax, depth limit  │
/// └───────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A required attribute or sub-element was absent.
    #[error("missing required attribute: {field}")]
    MissingRequiredAttribute { field: &'static str },

    /// The namespace does not map to any known protocol version.
    #[error("unknown namespace: {namespace}")]
    UnknownNamespace { namespace: String },

    /// The element carried no namespace at all.
    #[error("element <{element}> has no namespace")]
    MissingNamespace { element: &'static str },

    /// Input ended before the element's matching end tag.
    #[error("input ended before the element was closed")]
    TruncatedInput,

    /// A child had the shape of another wire version, or an element held
    /// a child where text was expected.
    #[error("malformed nested element: expected {expected}, found {found}")]
    MalformedNestedElement { expected: &'static str, found: String },

    /// A value was present but not lexically valid for its field type.
    #[error("invalid value {value:?} for field {field}")]
    InvalidFieldFormat { field: &'static str, value: String },

    /// An enumerated attribute carried a value outside its set.
    #[error("invalid {field} value: {value:?}")]
    InvalidEnumValue { field: &'static str, value: String },

    /// A grammar was invoked on an element it does not decode.
    #[error("expected element <{expected}>, found <{found}>")]
    UnexpectedElement { expected: &'static str, found: String },

    /// No protocol family is registered for this element.
    #[error("unsupported element <{name}> in namespace {namespace:?}")]
    UnsupportedElement {
        namespace: Option<String>,
        name: String,
    },

    /// A cursor-level failure with no protocol meaning of its own.
    #[error(transparent)]
    Wire(WireError),
}

impl From<WireError> for DecodeError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::TruncatedInput => Self::TruncatedInput,
            WireError::MissingRequiredAttribute { field } => {
                Self::MissingRequiredAttribute { field }
            }
            WireError::InvalidFieldFormat { field, value } => {
                Self::InvalidFieldFormat { field, value }
            }
            WireError::UnexpectedChild { expected, found } => {
                Self::MalformedNestedElement { expected, found }
            }
            WireError::UnexpectedElement { expected, found } => {
                Self::UnexpectedElement { expected, found }
            }
            other => Self::Wire(other),
        }
    }
}
