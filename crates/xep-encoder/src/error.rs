use xep_types::{IqType, StanzaKind};

/// Errors from [`StanzaEncoder::encode`](crate::StanzaEncoder::encode).
///
/// ```text
///   EncodeError
///   ├── MissingId                ← iq without an id
///   ├── PayloadCount             ← get/set with other than one payload
///   ├── UnexpectedErrorCondition ← condition on a non-error stanza
///   └── MissingErrorCondition    ← error iq without a condition
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("iq stanza requires an id")]
    MissingId,

    #[error("iq of type {kind} must carry exactly one payload, found {count}")]
    PayloadCount { kind: IqType, count: usize },

    #[error("stanza error condition set on a {stanza} that is not of type error")]
    UnexpectedErrorCondition { stanza: StanzaKind },

    #[error("iq of type error requires an error condition")]
    MissingErrorCondition,
}
