use serde::{Deserialize, Serialize};

/// The `type` attribute of a stanza `<error/>`: what the sender should do
/// about it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Auth,
    Cancel,
    Continue,
    Modify,
    Wait,
}

impl ErrorType {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Cancel => "cancel",
            Self::Continue => "continue",
            Self::Modify => "modify",
            Self::Wait => "wait",
        }
    }
}

/// Defined stanza error conditions, each with the error type it is
/// normally sent with.
///
/// ```text
/// ┌─────────────────────────┬────────┬──────────────────────────────────┐
/// │ Condition               │ Type   │ Typical upload use               │
/// ├─────────────────────────┼────────┼──────────────────────────────────┤
/// │ not-acceptable          │ modify │ with <file-too-large/>           │
/// │ resource-constraint     │ wait   │ with <retry/>                    │
/// │ forbidden               │ auth   │ user may not upload              │
/// │ bad-request             │ modify │ malformed request                │
/// │ service-unavailable     │ cancel │ no upload service                │
/// └─────────────────────────┴────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StanzaErrorCondition {
    BadRequest,
    Conflict,
    FeatureNotImplemented,
    Forbidden,
    InternalServerError,
    ItemNotFound,
    NotAcceptable,
    NotAllowed,
    NotAuthorized,
    PolicyViolation,
    ResourceConstraint,
    ServiceUnavailable,
    UndefinedCondition,
    UnexpectedRequest,
}

impl StanzaErrorCondition {
    /// Element name of the condition in the stanzas namespace.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::BadRequest => "bad-request",
            Self::Conflict => "conflict",
            Self::FeatureNotImplemented => "feature-not-implemented",
            Self::Forbidden => "forbidden",
            Self::InternalServerError => "internal-server-error",
            Self::ItemNotFound => "item-not-found",
            Self::NotAcceptable => "not-acceptable",
            Self::NotAllowed => "not-allowed",
            Self::NotAuthorized => "not-authorized",
            Self::PolicyViolation => "policy-violation",
            Self::ResourceConstraint => "resource-constraint",
            Self::ServiceUnavailable => "service-unavailable",
            Self::UndefinedCondition => "undefined-condition",
            Self::UnexpectedRequest => "unexpected-request",
        }
    }

    pub fn error_type(self) -> ErrorType {
        match self {
            Self::BadRequest | Self::NotAcceptable | Self::PolicyViolation => ErrorType::Modify,
            Self::Forbidden | Self::NotAuthorized => ErrorType::Auth,
            Self::ResourceConstraint | Self::UnexpectedRequest => ErrorType::Wait,
            Self::Conflict
            | Self::FeatureNotImplemented
            | Self::InternalServerError
            | Self::ItemNotFound
            | Self::NotAllowed
            | Self::ServiceUnavailable
            | Self::UndefinedCondition => ErrorType::Cancel,
        }
    }
}
